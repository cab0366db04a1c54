pub mod diagnostic;
pub mod error;
pub mod file;
pub mod fixer;
pub mod lexer;
pub mod rules;
pub mod ruleset;
pub mod sniff;
pub mod token;

pub use diagnostic::{Diagnostic, Severity};
pub use error::LintError;
pub use file::File;
pub use ruleset::{FixOutcome, Ruleset};
pub use sniff::{MethodParameter, Sniff, SniffFile};
pub use token::{Token, TokenKind};
