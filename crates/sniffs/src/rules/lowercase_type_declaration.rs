use crate::sniff::{Sniff, SniffFile};
use crate::token::TokenKind;

use super::type_registry::{is_return_type, parameter_type_kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeContext {
    ParameterTypeFound,
    ReturnTypeFound,
}

impl TypeContext {
    pub fn code(&self) -> &'static str {
        match self {
            TypeContext::ParameterTypeFound => "ParameterTypeFound",
            TypeContext::ReturnTypeFound => "ReturnTypeFound",
        }
    }

    fn subject(&self) -> &'static str {
        match self {
            TypeContext::ParameterTypeFound => "Parameter",
            TypeContext::ReturnTypeFound => "Return",
        }
    }
}

/// A type keyword spelled with the wrong letter case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCaseMismatch {
    pub position: usize,
    pub expected: String,
    pub found: String,
    pub context: TypeContext,
}

impl TypeCaseMismatch {
    pub fn message(&self) -> String {
        format!(
            "{} type declarations must be lowercase; expected \"{}\" but found \"{}\"",
            self.context.subject(),
            self.expected,
            self.found
        )
    }

    /// Report the mismatch and rewrite the token when the host accepts the fix.
    fn report(self, file: &mut dyn SniffFile) {
        let data = vec![self.expected.clone(), self.found.clone()];
        if file.add_fixable_error(self.position, self.context.code(), self.message(), data) {
            file.replace_token(self.position, &self.expected);
        }
    }
}

/// Flags parameter and return type declarations such as `Int` or `BOOL`
/// that should be written in lowercase.
#[derive(Debug, Default, Clone, Copy)]
pub struct LowerCaseTypeDeclaration;

impl Sniff for LowerCaseTypeDeclaration {
    fn code(&self) -> &'static str {
        "PHP.LowerCaseTypeDeclaration"
    }

    /// Arrow functions (`fn`) are not registered, so their parameters go
    /// unchecked; only their return type is reached through `ReturnType`.
    /// This keeps parity with PHP_CodeSniffer's WordPress sniff, which
    /// listens to `T_FUNCTION` and `T_CLOSURE` only.
    fn register(&self) -> &'static [TokenKind] {
        &[TokenKind::Function, TokenKind::Closure, TokenKind::ReturnType]
    }

    fn process(&self, file: &mut dyn SniffFile, ptr: usize) {
        match file.tokens().get(ptr).map(|token| token.kind) {
            Some(TokenKind::Function | TokenKind::Closure) => self.check_parameters(file, ptr),
            Some(TokenKind::ReturnType) => self.check_return_type(file, ptr),
            _ => {}
        }
    }
}

impl LowerCaseTypeDeclaration {
    fn check_parameters(&self, file: &mut dyn SniffFile, ptr: usize) {
        let params = file.method_parameters(ptr);
        for param in params {
            if param.type_hint.is_empty() {
                continue;
            }
            let type_hint = param.type_hint.strip_prefix('?').unwrap_or(&param.type_hint);
            let lower = type_hint.to_ascii_lowercase();
            let Some(kind) = parameter_type_kind(&lower) else {
                continue;
            };
            if lower == type_hint {
                continue;
            }
            let Some(type_ptr) = param
                .token
                .checked_sub(1)
                .and_then(|start| file.find_previous(kind, start, ptr, type_hint))
            else {
                tracing::trace!("no {kind} token {type_hint:?} between {ptr} and {}", param.token);
                continue;
            };
            TypeCaseMismatch {
                position: type_ptr,
                expected: lower,
                found: type_hint.to_string(),
                context: TypeContext::ParameterTypeFound,
            }
            .report(file);
        }
    }

    fn check_return_type(&self, file: &mut dyn SniffFile, ptr: usize) {
        let Some(content) = file.tokens().get(ptr).map(|token| token.content.clone()) else {
            return;
        };
        let lower = content.to_ascii_lowercase();
        if !is_return_type(&lower) || lower == content {
            return;
        }
        TypeCaseMismatch {
            position: ptr,
            expected: lower,
            found: content,
            context: TypeContext::ReturnTypeFound,
        }
        .report(file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::File;
    use crate::sniff::MethodParameter;
    use crate::token::Token;

    fn run(source: &str, fix: bool) -> File {
        let mut file = File::new("test.php", source, fix);
        let sniff = LowerCaseTypeDeclaration;
        for ptr in 0..file.tokens().len() {
            let kind = file.tokens()[ptr].kind;
            if sniff.register().contains(&kind) {
                sniff.process(&mut file, ptr);
            }
        }
        file
    }

    fn codes(file: &File) -> Vec<&str> {
        file.diagnostics().iter().map(|d| d.code()).collect()
    }

    #[test]
    fn flags_mixed_case_parameter() {
        let file = run("<?php function foo(Int $a) {}", false);
        assert_eq!(codes(&file), vec!["ParameterTypeFound"]);
        let diagnostic = &file.diagnostics()[0];
        assert_eq!(
            diagnostic.message,
            "Parameter type declarations must be lowercase; expected \"int\" but found \"Int\""
        );
        assert_eq!(diagnostic.data, vec!["int".to_string(), "Int".to_string()]);
        assert_eq!(file.tokens()[diagnostic.token].content, "Int");
    }

    #[test]
    fn report_only_leaves_source_untouched() {
        let source = "<?php function foo(Int $a): VOID {}";
        let file = run(source, false);
        assert_eq!(file.diagnostics().len(), 2);
        assert_eq!(file.contents(), source);
    }

    #[test]
    fn fixes_nullable_type_after_marker() {
        let file = run("<?php function foo(?Int $a) {}", true);
        let diagnostic = &file.diagnostics()[0];
        assert_eq!(diagnostic.data, vec!["int".to_string(), "Int".to_string()]);
        assert_eq!(file.contents(), "<?php function foo(?int $a) {}");
    }

    #[test]
    fn class_names_are_ignored() {
        let file = run("<?php function foo(MyClass $a, MYCLASS $b, \\Foo\\Int $c) {}", true);
        assert!(file.diagnostics().is_empty());
    }

    #[test]
    fn return_type_only() {
        let file = run("<?php function foo(int $a): VOID {}", true);
        assert_eq!(codes(&file), vec!["ReturnTypeFound"]);
        assert_eq!(
            file.diagnostics()[0].message,
            "Return type declarations must be lowercase; expected \"void\" but found \"VOID\""
        );
        assert_eq!(file.contents(), "<?php function foo(int $a): void {}");
    }

    #[test]
    fn parent_and_void_are_return_only() {
        let file = run("<?php class A extends B { function f(Parent $p): Parent {} }", false);
        assert_eq!(codes(&file), vec!["ReturnTypeFound"]);
    }

    #[test]
    fn each_violation_anchors_at_its_own_type() {
        let file = run("<?php function foo(INT $a, string $b, Bool $c) {}", true);
        let found: Vec<_> = file
            .diagnostics()
            .iter()
            .map(|d| file.tokens()[d.token].content.as_str())
            .collect();
        assert_eq!(found, vec!["INT", "Bool"]);
        assert_eq!(file.contents(), "<?php function foo(int $a, string $b, bool $c) {}");
    }

    #[test]
    fn default_value_text_is_not_the_type() {
        let source = "<?php function foo(string $a = Int, Int $b = Int) {}";
        let file = run(source, true);
        assert_eq!(file.diagnostics().len(), 1);
        assert_eq!(
            file.contents(),
            "<?php function foo(string $a = Int, int $b = Int) {}"
        );
    }

    #[test]
    fn closure_parameters_and_return() {
        let file = run("<?php $f = function (Callable $cb) use ($x): ?Self {};", true);
        assert_eq!(codes(&file), vec!["ParameterTypeFound", "ReturnTypeFound"]);
        assert_eq!(
            file.contents(),
            "<?php $f = function (callable $cb) use ($x): ?self {};"
        );
    }

    #[test]
    fn keyword_kinds_must_match() {
        // `Array` used as a class constant default is not the array hint.
        let file = run("<?php function foo(ARRAY $list = Foo::Array) {}", true);
        assert_eq!(codes(&file), vec!["ParameterTypeFound"]);
        assert_eq!(
            file.contents(),
            "<?php function foo(array $list = Foo::Array) {}"
        );
    }

    #[test]
    fn lowercase_input_is_clean() {
        let file = run(
            "<?php function foo(self $a, array $b, callable $c, ?int $d, iterable $e, object $f): void {}",
            true,
        );
        assert!(file.diagnostics().is_empty());
    }

    /// Host stub that returns a parameter whose type token does not exist.
    struct Unresolvable {
        tokens: Vec<Token>,
        errors: usize,
    }

    impl SniffFile for Unresolvable {
        fn tokens(&self) -> &[Token] {
            &self.tokens
        }

        fn method_parameters(&self, _ptr: usize) -> Vec<MethodParameter> {
            vec![MethodParameter {
                name: "$a".to_string(),
                token: 5,
                type_hint: "?Int".to_string(),
                type_hint_token: None,
                nullable_type: true,
                pass_by_reference: false,
                variable_length: false,
                default: None,
            }]
        }

        fn find_previous(&self, _: TokenKind, _: usize, _: usize, _: &str) -> Option<usize> {
            None
        }

        fn add_fixable_error(&mut self, _: usize, _: &str, _: String, _: Vec<String>) -> bool {
            self.errors += 1;
            true
        }

        fn replace_token(&mut self, _: usize, _: &str) -> bool {
            panic!("nothing to replace");
        }
    }

    #[test]
    fn unresolvable_type_token_is_skipped() {
        let mut host = Unresolvable {
            tokens: crate::lexer::tokenize("<?php function"),
            errors: 0,
        };
        let ptr = host
            .tokens
            .iter()
            .position(|token| token.kind == TokenKind::Function)
            .expect("function token");
        LowerCaseTypeDeclaration.process(&mut host, ptr);
        assert_eq!(host.errors, 0);
    }

    #[test]
    fn out_of_range_pointer_is_ignored() {
        let mut file = File::new("test.php", "<?php", true);
        LowerCaseTypeDeclaration.process(&mut file, 42);
        assert!(file.diagnostics().is_empty());
    }
}
