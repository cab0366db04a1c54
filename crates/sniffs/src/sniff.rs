use crate::token::{Token, TokenKind};

/// A parameter of a function-like signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    /// Variable name including the `$`.
    pub name: String,
    /// Position of the variable token.
    pub token: usize,
    /// Declared type as written, `?`-prefixed when nullable, empty when absent.
    pub type_hint: String,
    /// Position of the first type token, if any.
    pub type_hint_token: Option<usize>,
    pub nullable_type: bool,
    pub pass_by_reference: bool,
    pub variable_length: bool,
    /// Raw default value text.
    pub default: Option<String>,
}

/// The view of a file that sniffs work through.
pub trait SniffFile {
    fn tokens(&self) -> &[Token];

    /// Parameters of the function-like construct at `ptr`, in declaration order.
    fn method_parameters(&self, ptr: usize) -> Vec<MethodParameter>;

    /// Nearest token before `start` (inclusive) and after `end` (exclusive)
    /// with the given kind and exact content.
    fn find_previous(&self, kind: TokenKind, start: usize, end: usize, content: &str) -> Option<usize>;

    /// Record a fixable error and report whether the caller should apply the fix.
    fn add_fixable_error(&mut self, ptr: usize, code: &str, message: String, data: Vec<String>) -> bool;

    fn replace_token(&mut self, ptr: usize, content: &str) -> bool;
}

pub trait Sniff {
    /// Sniff code used as the prefix of every violation code it reports.
    fn code(&self) -> &'static str;

    /// Token kinds this sniff wants to be called for.
    fn register(&self) -> &'static [TokenKind];

    fn process(&self, file: &mut dyn SniffFile, ptr: usize);
}
