use std::collections::BTreeMap;

use crate::token::Token;

/// Collects token replacements for one pass over a file.
///
/// Replacements are keyed by token index, so positions stay stable for the
/// whole pass no matter how many tokens get rewritten.
#[derive(Debug, Default)]
pub struct Fixer {
    enabled: bool,
    replacements: BTreeMap<usize, String>,
    conflicts: usize,
}

impl Fixer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Queue `content` as the new text of token `ptr`.
    ///
    /// Returns false when fixing is disabled, the token does not exist, or a
    /// different replacement for the same token is already queued.
    pub fn replace_token(&mut self, tokens: &[Token], ptr: usize, content: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(token) = tokens.get(ptr) else {
            tracing::debug!("ignoring replacement of missing token {ptr}");
            return false;
        };
        if let Some(existing) = self.replacements.get(&ptr) {
            if existing == content {
                return true;
            }
            self.conflicts += 1;
            tracing::debug!(
                "conflicting replacement for token {ptr}: {existing:?} already queued, {content:?} refused"
            );
            return false;
        }
        if token.content == content {
            return true;
        }
        tracing::trace!("token {ptr} {:?} => {content:?}", token.content);
        self.replacements.insert(ptr, content.to_string());
        true
    }

    pub fn fix_count(&self) -> usize {
        self.replacements.len()
    }

    pub fn conflicts(&self) -> usize {
        self.conflicts
    }

    pub fn contents(&self, tokens: &[Token]) -> String {
        let mut out = String::with_capacity(tokens.iter().map(Token::len).sum());
        for (idx, token) in tokens.iter().enumerate() {
            match self.replacements.get(&idx) {
                Some(replacement) => out.push_str(replacement),
                None => out.push_str(&token.content),
            }
        }
        out
    }
}
