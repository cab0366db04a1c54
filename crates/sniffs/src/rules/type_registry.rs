//! Type keywords checked by [`super::LowerCaseTypeDeclaration`].
//!
//! Parameter types record the token kind the keyword is emitted as. `self`,
//! `array` and `callable` get their own kinds, while the scalar and compound
//! types (`int`, `object`, ...) are emitted as plain identifiers, exactly like
//! class names. Searching by kind plus exact text is what keeps a class named
//! `Int` in one place from being confused with the keyword in another.

use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeKeyword {
    pub name: &'static str,
    pub kind: TokenKind,
}

pub static PARAMETER_TYPES: [TypeKeyword; 9] = [
    TypeKeyword {
        name: "self",
        kind: TokenKind::SelfKeyword,
    },
    TypeKeyword {
        name: "array",
        kind: TokenKind::ArrayHint,
    },
    TypeKeyword {
        name: "callable",
        kind: TokenKind::Callable,
    },
    TypeKeyword {
        name: "bool",
        kind: TokenKind::Identifier,
    },
    TypeKeyword {
        name: "float",
        kind: TokenKind::Identifier,
    },
    TypeKeyword {
        name: "int",
        kind: TokenKind::Identifier,
    },
    TypeKeyword {
        name: "string",
        kind: TokenKind::Identifier,
    },
    TypeKeyword {
        name: "iterable",
        kind: TokenKind::Identifier,
    },
    TypeKeyword {
        name: "object",
        kind: TokenKind::Identifier,
    },
];

pub static RETURN_TYPES: [&str; 11] = [
    "array", "bool", "callable", "float", "int", "parent", "self", "string", "iterable", "void",
    "object",
];

/// Token kind a lowercase parameter type keyword is emitted as.
pub fn parameter_type_kind(lower: &str) -> Option<TokenKind> {
    PARAMETER_TYPES
        .iter()
        .find(|keyword| keyword.name == lower)
        .map(|keyword| keyword.kind)
}

pub fn is_return_type(lower: &str) -> bool {
    RETURN_TYPES.contains(&lower)
}
