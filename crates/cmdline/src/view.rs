/// Read-only view over a process invocation.
///
/// Element 0 of the wrapped slice is the program name; everything after it is
/// what [`Parser::parse`](crate::Parser::parse) scans.
///
/// ```
/// use cmdline::ArgumentView;
///
/// let raw = ["prog", "-v", "input.txt"];
/// let view = ArgumentView::new(&raw);
/// assert_eq!(view.program_name(), "prog");
/// assert_eq!(view.argument_count(), 2);
/// assert_eq!(view.argument(1), Some("input.txt"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArgumentView<'a, S: AsRef<str> = String> {
    raw: &'a [S],
}

impl<'a, S: AsRef<str>> ArgumentView<'a, S> {
    pub fn new(raw: &'a [S]) -> Self {
        Self { raw }
    }

    /// The first raw argument, or `""` for an empty invocation.
    pub fn program_name(&self) -> &'a str {
        self.raw.first().map(|s| s.as_ref()).unwrap_or("")
    }

    /// Number of arguments, program name excluded.
    pub fn argument_count(&self) -> usize {
        self.raw.len().saturating_sub(1)
    }

    /// The `index`-th argument after the program name.
    pub fn argument(&self, index: usize) -> Option<&'a str> {
        self.raw.get(index + 1).map(|s| s.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.raw.iter().skip(1).map(|s| s.as_ref())
    }
}
