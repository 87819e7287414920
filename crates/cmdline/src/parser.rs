use std::collections::HashMap;
use std::fmt;

use crate::error::{DeclarationError, DeclarationResult, ParseError, ParseResult};
use crate::names::OptionNames;
use crate::view::ArgumentView;

const SEPARATOR: &str = "--";

pub(crate) enum Action<'a> {
    Flag(Box<dyn FnMut() + 'a>),
    Value(Box<dyn FnMut(&str) + 'a>),
}

impl fmt::Debug for Action<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(_) => f.write_str("Flag"),
            Self::Value(_) => f.write_str("Value"),
        }
    }
}

#[derive(Debug)]
pub(crate) struct OptionDef<'a> {
    pub(crate) names: Vec<String>,
    pub(crate) value_name: String,
    pub(crate) description: String,
    pub(crate) action: Action<'a>,
}

impl OptionDef<'_> {
    pub(crate) fn takes_value(&self) -> bool {
        matches!(self.action, Action::Value(_))
    }
}

pub(crate) struct PositionalDef<'a> {
    pub(crate) value_name: String,
    pub(crate) description: String,
    pub(crate) action: Box<dyn FnMut(&str) + 'a>,
}

impl fmt::Debug for PositionalDef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionalDef")
            .field("value_name", &self.value_name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Command-line parser that dispatches each scanned token to a callback.
///
/// Options are declared under one or more aliases; the dash count used on the
/// command line is not part of an option's identity, so an alias `f` matches
/// both `-f` and `--f`. Positional arguments are mandatory and filled in
/// declaration order.
///
/// ```
/// use cmdline::Parser;
///
/// let mut verbose = false;
/// let mut output = String::new();
/// let mut input = String::new();
/// {
///     let mut parser = Parser::new();
///     parser.flag(["v", "verbose"], "Verbose output", || verbose = true)?;
///     parser.value_option(["o", "output"], "FILE", "Output file", |v| output = v.to_string())?;
///     parser.positional("INPUT", "Input file", |v| input = v.to_string());
///     parser.parse_from(["--output=out.txt", "-v", "in.txt"])?;
/// }
/// assert!(verbose);
/// assert_eq!(output, "out.txt");
/// assert_eq!(input, "in.txt");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct Parser<'a> {
    index: HashMap<String, usize>,
    pub(crate) options: Vec<OptionDef<'a>>,
    pub(crate) positionals: Vec<PositionalDef<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a flag option: presence alone fires `action`.
    pub fn flag<N, F>(
        &mut self,
        names: N,
        description: impl Into<String>,
        action: F,
    ) -> DeclarationResult<&mut Self>
    where
        N: OptionNames,
        F: FnMut() + 'a,
    {
        self.declare(
            names.into_names(),
            String::new(),
            description.into(),
            Action::Flag(Box::new(action)),
        )
    }

    /// Declare an option that takes exactly one value, given either as
    /// `-name=value` or as the following argument.
    pub fn value_option<N, F>(
        &mut self,
        names: N,
        value_name: impl Into<String>,
        description: impl Into<String>,
        action: F,
    ) -> DeclarationResult<&mut Self>
    where
        N: OptionNames,
        F: FnMut(&str) + 'a,
    {
        self.declare(
            names.into_names(),
            value_name.into(),
            description.into(),
            Action::Value(Box::new(action)),
        )
    }

    /// Declare the next mandatory positional argument.
    pub fn positional<F>(
        &mut self,
        value_name: impl Into<String>,
        description: impl Into<String>,
        action: F,
    ) -> &mut Self
    where
        F: FnMut(&str) + 'a,
    {
        let value_name = value_name.into();
        tracing::trace!(slot = self.positionals.len(), %value_name, "declared positional");
        self.positionals.push(PositionalDef {
            value_name,
            description: description.into(),
            action: Box::new(action),
        });
        self
    }

    fn declare(
        &mut self,
        names: Vec<String>,
        value_name: String,
        description: String,
        action: Action<'a>,
    ) -> DeclarationResult<&mut Self> {
        if names.is_empty() {
            return Err(DeclarationError::NoNames);
        }
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(DeclarationError::EmptyName);
            }
            if self.index.contains_key(name) || names[..i].contains(name) {
                return Err(DeclarationError::DuplicateName(name.clone()));
            }
        }

        let idx = self.options.len();
        for name in &names {
            self.index.insert(name.clone(), idx);
        }
        tracing::trace!(?names, kind = ?action, "declared option");
        self.options.push(OptionDef {
            names,
            value_name,
            description,
            action,
        });
        Ok(self)
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn positional_count(&self) -> usize {
        self.positionals.len()
    }

    #[cfg(test)]
    pub(crate) fn has_option(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Scan the arguments of `args` left to right, firing callbacks.
    ///
    /// Each call is independent; no state survives between calls.
    pub fn parse<S: AsRef<str>>(&mut self, args: &ArgumentView<'_, S>) -> ParseResult<()> {
        self.scan(args.iter())
    }

    /// Like [`parse`](Self::parse) for arguments that do not start with a
    /// program name.
    pub fn parse_from<I>(&mut self, args: I) -> ParseResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<I::Item> = args.into_iter().collect();
        self.scan(args.iter().map(|s| s.as_ref()))
    }

    fn scan<'t>(&mut self, mut args: impl Iterator<Item = &'t str>) -> ParseResult<()> {
        let mut positionals_seen = 0usize;
        let mut option_parsing = !self.options.is_empty();

        while let Some(arg) = args.next() {
            if option_parsing && arg.starts_with('-') {
                if arg == SEPARATOR {
                    option_parsing = false;
                    continue;
                }

                let Some((name, inline)) = split_option(arg) else {
                    return Err(ParseError::BadFormat(arg.to_string()));
                };
                let Some(&idx) = self.index.get(name) else {
                    return Err(ParseError::UnknownOption(as_written(arg)));
                };

                match &mut self.options[idx].action {
                    Action::Flag(action) => {
                        if inline.is_some() {
                            return Err(ParseError::FlagTakesValue(as_written(arg)));
                        }
                        action();
                    }
                    Action::Value(action) => {
                        let value = match inline {
                            Some(value) => value,
                            None => args
                                .next()
                                .ok_or_else(|| ParseError::MissingValue(as_written(arg)))?,
                        };
                        action(value);
                    }
                }
                continue;
            }

            let expected = self.positionals.len();
            let Some(slot) = self.positionals.get_mut(positionals_seen) else {
                return Err(ParseError::UnexpectedArgument {
                    argument: arg.to_string(),
                    position: positionals_seen,
                    expected,
                });
            };
            (slot.action)(arg);
            positionals_seen += 1;
        }

        if positionals_seen != self.positionals.len() {
            return Err(ParseError::MissingArguments {
                seen: positionals_seen,
                required: self.positionals.len(),
            });
        }

        tracing::trace!(positionals = positionals_seen, "scan complete");
        Ok(())
    }
}

/// Split an option token into its name and inline value.
///
/// Accepts one or two leading dashes, a non-empty name without `=`, then an
/// optional `=value`. A second dash is only part of the prefix when a name
/// remains after it, so `--=x` yields the name `-`.
pub(crate) fn split_option(token: &str) -> Option<(&str, Option<&str>)> {
    let body = token.strip_prefix('-')?;
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (body, None),
    };
    let name = match name.strip_prefix('-') {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    };
    if name.is_empty() {
        return None;
    }
    Some((name, value))
}

fn as_written(token: &str) -> String {
    token
        .split_once('=')
        .map_or(token, |(prefix, _)| prefix)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn split_option_strips_one_or_two_dashes() {
        assert_eq!(split_option("-f"), Some(("f", None)));
        assert_eq!(split_option("--f"), Some(("f", None)));
        assert_eq!(split_option("--file"), Some(("file", None)));
        assert_eq!(split_option("-opt=value"), Some(("opt", Some("value"))));
        assert_eq!(split_option("--opt=value"), Some(("opt", Some("value"))));
        assert_eq!(split_option("--opt="), Some(("opt", Some(""))));
        assert_eq!(split_option("--a=b=c"), Some(("a", Some("b=c"))));
    }

    #[test]
    fn split_option_matches_backtracking_edge_cases() {
        assert_eq!(split_option("---x"), Some(("-x", None)));
        assert_eq!(split_option("--=x"), Some(("-", Some("x"))));
        assert_eq!(split_option("-"), None);
        assert_eq!(split_option("-=x"), None);
        assert_eq!(split_option("plain"), None);
    }

    #[test]
    fn flag_alias_matches_any_dash_count() {
        let hits = Cell::new(0);
        let mut parser = Parser::new();
        parser.flag("f", "", || hits.set(hits.get() + 1)).unwrap();
        parser.parse_from(["-f"]).unwrap();
        parser.parse_from(["--f"]).unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn help_flag_fires_once() {
        let hits = Cell::new(0);
        let mut parser = Parser::new();
        parser
            .flag(["h", "help"], "Show help", || hits.set(hits.get() + 1))
            .unwrap();
        let raw = ["prog", "-h"];
        parser.parse(&ArgumentView::new(&raw)).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn repeated_flag_fires_per_token() {
        let hits = Cell::new(0);
        let mut parser = Parser::new();
        parser.flag("f", "", || hits.set(hits.get() + 1)).unwrap();
        let raw = ["prog", "-f", "--f"];
        parser.parse(&ArgumentView::new(&raw)).unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn value_forms_are_equivalent() {
        for argv in [
            vec!["-opt=value"],
            vec!["--opt=value"],
            vec!["-opt", "value"],
            vec!["--opt", "value"],
        ] {
            let seen = RefCell::new(Vec::new());
            let mut parser = Parser::new();
            parser
                .value_option("opt", "V", "", |v| seen.borrow_mut().push(v.to_string()))
                .unwrap();
            parser.parse_from(&argv).unwrap();
            drop(parser);
            assert_eq!(seen.into_inner(), vec!["value"], "argv: {argv:?}");
        }
    }

    #[test]
    fn long_value_option_with_inline_value() {
        let seen = RefCell::new(None);
        let mut parser = Parser::new();
        parser
            .value_option(["f", "file"], "FILE", "Output file", |v| {
                *seen.borrow_mut() = Some(v.to_string())
            })
            .unwrap();
        let raw = ["prog", "--file=out.txt"];
        parser.parse(&ArgumentView::new(&raw)).unwrap();
        assert_eq!(seen.borrow().as_deref(), Some("out.txt"));
    }

    #[test]
    fn inline_value_may_be_empty() {
        let seen = RefCell::new(None);
        let mut parser = Parser::new();
        parser
            .value_option("o", "V", "", |v| *seen.borrow_mut() = Some(v.to_string()))
            .unwrap();
        parser.parse_from(["-o="]).unwrap();
        assert_eq!(seen.borrow().as_deref(), Some(""));
    }

    #[test]
    fn value_option_consumes_next_token_even_if_dashed() {
        let seen = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser
            .value_option("f", "V", "", |v| seen.borrow_mut().push(v.to_string()))
            .unwrap();
        let raw = ["prog", "-f", "--f"];
        parser.parse(&ArgumentView::new(&raw)).unwrap();
        assert_eq!(*seen.borrow(), vec!["--f"]);
    }

    #[test]
    fn value_option_without_value_fails() {
        let mut parser = Parser::new();
        parser.value_option(["o", "output"], "FILE", "", |_| {}).unwrap();
        let err = parser.parse_from(["--output"]).unwrap_err();
        assert_eq!(err, ParseError::MissingValue("--output".to_string()));
    }

    #[test]
    fn flag_rejects_inline_value() {
        let hits = Cell::new(0);
        let mut parser = Parser::new();
        parser.flag("opt", "", || hits.set(hits.get() + 1)).unwrap();
        let err = parser.parse_from(["-opt=x"]).unwrap_err();
        assert_eq!(err, ParseError::FlagTakesValue("-opt".to_string()));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unknown_option_reports_name_as_written() {
        let mut parser = Parser::new();
        parser.flag("f", "", || {}).unwrap();
        assert_eq!(
            parser.parse_from(["-z"]).unwrap_err(),
            ParseError::UnknownOption("-z".to_string())
        );
        assert_eq!(
            parser.parse_from(["--zeta=1"]).unwrap_err(),
            ParseError::UnknownOption("--zeta".to_string())
        );
    }

    #[test]
    fn malformed_option_tokens_fail() {
        let mut parser = Parser::new();
        parser.flag("f", "", || {}).unwrap();
        assert_eq!(
            parser.parse_from(["-"]).unwrap_err(),
            ParseError::BadFormat("-".to_string())
        );
        assert_eq!(
            parser.parse_from(["-=x"]).unwrap_err(),
            ParseError::BadFormat("-=x".to_string())
        );
    }

    #[test]
    fn no_options_treats_dashed_tokens_as_positionals() {
        let seen = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser.positional("A", "", |v| seen.borrow_mut().push(format!("A={v}")));
        parser.positional("B", "", |v| seen.borrow_mut().push(format!("B={v}")));
        parser.parse_from(["-f", "a"]).unwrap();
        assert_eq!(*seen.borrow(), vec!["A=-f", "B=a"]);
    }

    #[test]
    fn no_options_passes_separator_through() {
        let seen = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser.positional("A", "", |v| seen.borrow_mut().push(v.to_string()));
        parser.parse_from(["--"]).unwrap();
        assert_eq!(*seen.borrow(), vec!["--"]);
    }

    #[test]
    fn separator_disables_option_parsing() {
        let flag_hits = Cell::new(0);
        let seen = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser.flag("f", "", || flag_hits.set(flag_hits.get() + 1)).unwrap();
        parser.positional("A", "", |v| seen.borrow_mut().push(v.to_string()));
        parser.parse_from(["--", "-f"]).unwrap();
        assert_eq!(flag_hits.get(), 0);
        assert_eq!(*seen.borrow(), vec!["-f"]);
    }

    #[test]
    fn second_separator_counts_as_positional() {
        let seen = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser.flag("f", "", || {}).unwrap();
        parser.positional("A", "", |v| seen.borrow_mut().push(v.to_string()));
        parser.parse_from(["--", "--"]).unwrap();
        assert_eq!(*seen.borrow(), vec!["--"]);
    }

    #[test]
    fn positionals_fill_in_declaration_order() {
        let first = RefCell::new(String::new());
        let second = RefCell::new(String::new());
        let mut parser = Parser::new();
        parser
            .positional("arg1", "", |v| *first.borrow_mut() = v.to_string())
            .positional("arg2", "", |v| *second.borrow_mut() = v.to_string());
        let raw = ["prog", "1a", "a2"];
        parser.parse(&ArgumentView::new(&raw)).unwrap();
        assert_eq!(*first.borrow(), "1a");
        assert_eq!(*second.borrow(), "a2");
    }

    #[test]
    fn positional_arity_must_match_exactly() {
        let mut parser = Parser::new();
        parser.positional("A", "", |_| {}).positional("B", "", |_| {});

        assert!(parser.parse_from(["x", "y"]).is_ok());
        assert_eq!(
            parser.parse_from(["x"]).unwrap_err(),
            ParseError::MissingArguments { seen: 1, required: 2 }
        );
        assert_eq!(
            parser.parse_from(["x", "y", "z"]).unwrap_err(),
            ParseError::UnexpectedArgument {
                argument: "z".to_string(),
                position: 2,
                expected: 2,
            }
        );
    }

    #[test]
    fn empty_argument_list_without_positionals_is_ok() {
        let mut parser = Parser::new();
        parser.flag("v", "", || {}).unwrap();
        assert!(parser.parse_from(Vec::<String>::new()).is_ok());
        assert!(Parser::new().parse_from(["unexpected"]).is_err());
    }

    #[test]
    fn callbacks_fire_in_scan_order() {
        let log = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser
            .flag("v", "", || log.borrow_mut().push("v".to_string()))
            .unwrap()
            .value_option("o", "V", "", |v| log.borrow_mut().push(format!("o={v}")))
            .unwrap()
            .positional("IN", "", |v| log.borrow_mut().push(format!("in={v}")));
        parser.parse_from(["-o", "x", "file", "-v"]).unwrap();
        assert_eq!(*log.borrow(), vec!["o=x", "in=file", "v"]);
    }

    #[test]
    fn failed_parse_keeps_earlier_callbacks() {
        let hits = Cell::new(0);
        let mut parser = Parser::new();
        parser.flag("v", "", || hits.set(hits.get() + 1)).unwrap();
        assert!(parser.parse_from(["-v", "-q"]).is_err());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn declaration_rejects_collisions_and_empty_names() {
        let mut parser = Parser::new();
        parser.flag(["h", "help"], "", || {}).unwrap();

        assert_eq!(
            parser.value_option(["o", "help"], "V", "", |_| {}).unwrap_err(),
            DeclarationError::DuplicateName("help".to_string())
        );
        assert_eq!(
            parser.flag(Vec::<String>::new(), "", || {}).unwrap_err(),
            DeclarationError::NoNames
        );
        assert_eq!(
            parser.flag(["q", ""], "", || {}).unwrap_err(),
            DeclarationError::EmptyName
        );
        assert_eq!(
            parser.flag(["x", "x"], "", || {}).unwrap_err(),
            DeclarationError::DuplicateName("x".to_string())
        );

        // Failed declarations register nothing.
        assert_eq!(parser.option_count(), 1);
        assert!(!parser.has_option("o"));
        assert!(!parser.has_option("q"));
    }

    #[test]
    fn parses_are_independent() {
        let seen = RefCell::new(Vec::new());
        let mut parser = Parser::new();
        parser.flag("f", "", || {}).unwrap();
        parser.positional("A", "", |v| seen.borrow_mut().push(v.to_string()));
        parser.parse_from(["--", "-f"]).unwrap();
        // The separator from the previous call does not carry over.
        assert!(parser.parse_from(["-f", "x"]).is_ok());
        assert_eq!(*seen.borrow(), vec!["-f", "x"]);
    }
}
