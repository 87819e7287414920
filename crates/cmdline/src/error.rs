use thiserror::Error;

/// Raised while declaring options on a [`Parser`](crate::Parser).
///
/// The parser keeps whatever was registered before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    #[error("option declared without any names")]
    NoNames,

    #[error("option names must not be empty")]
    EmptyName,

    #[error("option name '{0}' is already declared")]
    DuplicateName(String),
}

/// Raised while scanning an argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("bad option format: {0}")]
    BadFormat(String),

    /// Carries the option as written, dash prefix included.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {0} is a flag and takes no value")]
    FlagTakesValue(String),

    #[error("option {0} requires a value")]
    MissingValue(String),

    #[error(
        "unexpected argument '{argument}' at position {position}: \
         {expected} positional argument(s) expected"
    )]
    UnexpectedArgument {
        argument: String,
        position: usize,
        expected: usize,
    },

    #[error("insufficient positional arguments: got {seen}, {required} required")]
    MissingArguments { seen: usize, required: usize },
}

pub type DeclarationResult<T> = Result<T, DeclarationError>;
pub type ParseResult<T> = Result<T, ParseError>;
