//! Small callback-driven command-line parser.
//!
//! Declare flags, value options and positional arguments on a [`Parser`],
//! each with a callback, then hand it an [`ArgumentView`] (or any sequence of
//! strings). Tokens are scanned strictly left to right and every scanned token
//! fires at most one callback:
//!
//! - `-name` / `--name` fires a flag; the dash count does not matter.
//! - `-name=value`, `--name=value`, `-name value` and `--name value` all hand
//!   `value` to a value option.
//! - `--` turns option parsing off for the rest of the scan.
//! - Everything else fills the next positional slot. All slots are mandatory.
//!
//! A parser with no declared options never interprets dashes at all.
//!
//! Failures are split in two: [`DeclarationError`] while declaring, and
//! [`ParseError`] while scanning.

mod error;
mod names;
mod parser;
mod usage;
mod view;

pub use error::{DeclarationError, DeclarationResult, ParseError, ParseResult};
pub use names::OptionNames;
pub use parser::Parser;
pub use view::ArgumentView;
