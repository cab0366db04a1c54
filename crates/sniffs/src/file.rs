use std::path::{Path, PathBuf};

use crate::diagnostic::{Diagnostic, Severity};
use crate::error::LintError;
use crate::fixer::Fixer;
use crate::lexer::{matching_close, signature_opener, tokenize};
use crate::sniff::{MethodParameter, SniffFile};
use crate::token::{Token, TokenKind};

/// A tokenized source file plus everything sniffs report against it.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    fixer: Fixer,
    active_sniff: &'static str,
}

impl File {
    pub fn new(path: impl Into<PathBuf>, source: &str, fix: bool) -> Self {
        Self {
            path: path.into(),
            tokens: tokenize(source),
            diagnostics: Vec::new(),
            fixer: Fixer::new(fix),
            active_sniff: "",
        }
    }

    pub fn from_path(path: &Path, fix: bool) -> Result<Self, LintError> {
        let source = read_source(path)?;
        Ok(Self::new(path, &source, fix))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn fixer(&self) -> &Fixer {
        &self.fixer
    }

    /// File text with every queued replacement applied.
    pub fn contents(&self) -> String {
        self.fixer.contents(&self.tokens)
    }

    pub(crate) fn set_active_sniff(&mut self, code: &'static str) {
        self.active_sniff = code;
    }
}

pub fn read_source(path: &Path) -> Result<String, LintError> {
    let bytes = std::fs::read(path).map_err(|source| LintError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LintError::Encoding {
        path: path.to_path_buf(),
    })
}

impl SniffFile for File {
    fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    fn method_parameters(&self, ptr: usize) -> Vec<MethodParameter> {
        let tokens = &self.tokens;
        let is_function_like = tokens.get(ptr).is_some_and(|token| {
            matches!(
                token.kind,
                TokenKind::Function | TokenKind::Closure | TokenKind::Fn
            )
        });
        if !is_function_like {
            return Vec::new();
        }
        let Some(opener) = signature_opener(tokens, ptr) else {
            return Vec::new();
        };
        let Some(closer) = matching_close(tokens, opener) else {
            return Vec::new();
        };

        let mut params = Vec::new();
        let mut current = ParameterBuilder::default();
        let mut depth = 0usize;

        for (idx, token) in tokens.iter().enumerate().take(closer).skip(opener + 1) {
            if depth > 0 {
                match token.kind {
                    TokenKind::OpenParen
                    | TokenKind::OpenBracket
                    | TokenKind::OpenBrace
                    | TokenKind::AttributeOpen => depth += 1,
                    TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                        depth = depth.saturating_sub(1)
                    }
                    _ => {}
                }
                current.extend_default(token);
                continue;
            }

            match token.kind {
                TokenKind::OpenParen
                | TokenKind::OpenBracket
                | TokenKind::OpenBrace
                | TokenKind::AttributeOpen => {
                    depth += 1;
                    current.extend_default(token);
                }
                TokenKind::Comma => {
                    params.extend(std::mem::take(&mut current).finish(tokens));
                }
                _ if current.default.is_some() => current.extend_default(token),
                TokenKind::Equals => current.default = Some(String::new()),
                TokenKind::Nullable if current.variable.is_none() => {
                    current.nullable_type = true;
                    current.type_hint.push('?');
                }
                TokenKind::NsSeparator if current.variable.is_none() => {
                    current.push_type(idx, token);
                }
                kind if kind.is_type_name() && current.variable.is_none() => {
                    current.push_type(idx, token);
                }
                TokenKind::Ampersand if current.variable.is_none() => {
                    current.pass_by_reference = true;
                }
                TokenKind::Ellipsis => current.variable_length = true,
                TokenKind::Variable if current.variable.is_none() => {
                    current.variable = Some(idx);
                }
                _ => {}
            }
        }
        params.extend(current.finish(tokens));
        params
    }

    fn find_previous(&self, kind: TokenKind, start: usize, end: usize, content: &str) -> Option<usize> {
        let last = self.tokens.len().checked_sub(1)?;
        let start = start.min(last);
        for idx in (end + 1..=start).rev() {
            let token = &self.tokens[idx];
            if token.kind == kind && token.content == content {
                return Some(idx);
            }
            if token.kind == TokenKind::Semicolon {
                break;
            }
        }
        None
    }

    fn add_fixable_error(&mut self, ptr: usize, code: &str, message: String, data: Vec<String>) -> bool {
        let (line, column, length) = self
            .tokens
            .get(ptr)
            .map(|token| (token.line, token.column, token.content.chars().count().max(1)))
            .unwrap_or((1, 1, 1));
        let source = if self.active_sniff.is_empty() {
            code.to_string()
        } else {
            format!("{}.{}", self.active_sniff, code)
        };
        tracing::debug!("{}:{line}:{column} {source}: {message}", self.path.display());
        self.diagnostics.push(Diagnostic {
            source,
            line,
            column,
            length,
            message,
            data,
            severity: Severity::Error,
            fixable: true,
            token: ptr,
        });
        self.fixer.enabled()
    }

    fn replace_token(&mut self, ptr: usize, content: &str) -> bool {
        self.fixer.replace_token(&self.tokens, ptr, content)
    }
}

#[derive(Debug, Default)]
struct ParameterBuilder {
    variable: Option<usize>,
    type_hint: String,
    type_hint_token: Option<usize>,
    nullable_type: bool,
    pass_by_reference: bool,
    variable_length: bool,
    default: Option<String>,
}

impl ParameterBuilder {
    fn push_type(&mut self, idx: usize, token: &Token) {
        self.type_hint_token.get_or_insert(idx);
        self.type_hint.push_str(&token.content);
    }

    fn extend_default(&mut self, token: &Token) {
        if let Some(default) = self.default.as_mut() {
            default.push_str(&token.content);
        }
    }

    fn finish(self, tokens: &[Token]) -> Option<MethodParameter> {
        let token = self.variable?;
        Some(MethodParameter {
            name: tokens[token].content.clone(),
            token,
            type_hint: self.type_hint,
            type_hint_token: self.type_hint_token,
            nullable_type: self.nullable_type,
            pass_by_reference: self.pass_by_reference,
            variable_length: self.variable_length,
            default: self.default.map(|value| value.trim().to_string()),
        })
    }
}
