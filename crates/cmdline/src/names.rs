/// Alias collection accepted when declaring an option.
///
/// Accepts a single name or multiple names via array/slice/vec, so both
/// `parser.flag("v", ...)` and `parser.flag(["h", "help"], ...)` work.
pub trait OptionNames {
    fn into_names(self) -> Vec<String>;
}

impl OptionNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl OptionNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl OptionNames for &[&str] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(|s| s.to_string()).collect()
    }
}

impl<const N: usize> OptionNames for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl OptionNames for Vec<&str> {
    fn into_names(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl OptionNames for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

impl OptionNames for &[String] {
    fn into_names(self) -> Vec<String> {
        self.to_vec()
    }
}

/// Render a declared name the way a user would type it.
pub(crate) fn display_name(name: &str) -> String {
    if name.chars().count() == 1 {
        format!("-{name}")
    } else {
        format!("--{name}")
    }
}
