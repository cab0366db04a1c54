use std::collections::HashMap;
use std::path::Path;

use crate::diagnostic::Diagnostic;
use crate::file::File;
use crate::rules::LowerCaseTypeDeclaration;
use crate::sniff::{Sniff, SniffFile};
use crate::token::TokenKind;

/// Upper bound on fix passes over one file, matching PHP_CodeSniffer's fixer.
pub const MAX_FIX_PASSES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub contents: String,
    pub passes: usize,
    pub fixes_applied: usize,
    /// False when the file was still changing after [`MAX_FIX_PASSES`].
    pub converged: bool,
    /// Replacements refused because another fix already claimed the token.
    pub conflicts: usize,
    /// Diagnostics left after fixing.
    pub remaining: Vec<Diagnostic>,
}

#[derive(Default)]
pub struct Ruleset {
    sniffs: Vec<Box<dyn Sniff>>,
    listeners: HashMap<TokenKind, Vec<usize>>,
}

impl Ruleset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut ruleset = Self::new();
        ruleset.add(LowerCaseTypeDeclaration);
        ruleset
    }

    pub fn add(&mut self, sniff: impl Sniff + 'static) {
        let idx = self.sniffs.len();
        for kind in sniff.register() {
            self.listeners.entry(*kind).or_default().push(idx);
        }
        tracing::debug!("registered sniff {}", sniff.code());
        self.sniffs.push(Box::new(sniff));
    }

    pub fn sniff_codes(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|sniff| sniff.code()).collect()
    }

    /// Run every sniff over the file, in token order.
    pub fn process(&self, file: &mut File) {
        for ptr in 0..file.tokens().len() {
            let kind = file.tokens()[ptr].kind;
            let Some(listeners) = self.listeners.get(&kind) else {
                continue;
            };
            for &idx in listeners {
                let sniff = &self.sniffs[idx];
                file.set_active_sniff(sniff.code());
                sniff.process(&mut *file, ptr);
            }
        }
    }

    /// Report-only pass.
    pub fn check(&self, path: &Path, source: &str) -> Vec<Diagnostic> {
        let mut file = File::new(path, source, false);
        self.process(&mut file);
        file.into_diagnostics()
    }

    /// Fix the source until a pass makes no further changes.
    pub fn fix(&self, path: &Path, source: &str) -> FixOutcome {
        let mut contents = source.to_string();
        let mut passes = 0;
        let mut fixes_applied = 0;
        let mut converged = false;
        let mut conflicts = 0;

        while passes < MAX_FIX_PASSES {
            passes += 1;
            let mut file = File::new(path, &contents, true);
            self.process(&mut file);
            let applied = file.fixer().fix_count();
            conflicts += file.fixer().conflicts();
            if applied == 0 {
                converged = true;
                break;
            }
            tracing::debug!("{}: pass {passes} applied {applied} fixes", path.display());
            fixes_applied += applied;
            contents = file.contents();
        }

        if !converged {
            tracing::warn!(
                "{} still changing after {MAX_FIX_PASSES} fix passes",
                path.display()
            );
        }

        let remaining = self.check(path, &contents);
        FixOutcome {
            contents,
            passes,
            fixes_applied,
            converged,
            conflicts,
            remaining,
        }
    }
}
