//! Lossless PHP tokenizer.
//!
//! Produces the token stream the sniffs run over. Every byte of the input ends
//! up in exactly one token, so concatenating token contents gives back the
//! original source; the fixer relies on that to rebuild files.
//!
//! After the raw scan, [`tokenize`] runs an extra pass that classifies tokens
//! by their position in function signatures (closures, array hints, nullable
//! markers, return types), which the raw scan cannot see.

use crate::token::{Token, TokenKind};

const RESERVED_WORDS: &[&str] = &[
    "abstract",
    "and",
    "as",
    "break",
    "case",
    "catch",
    "class",
    "clone",
    "const",
    "continue",
    "declare",
    "default",
    "do",
    "echo",
    "else",
    "elseif",
    "empty",
    "enddeclare",
    "endfor",
    "endforeach",
    "endif",
    "endswitch",
    "endwhile",
    "extends",
    "final",
    "finally",
    "for",
    "foreach",
    "global",
    "goto",
    "if",
    "implements",
    "include",
    "include_once",
    "instanceof",
    "insteadof",
    "interface",
    "isset",
    "list",
    "namespace",
    "new",
    "or",
    "print",
    "private",
    "protected",
    "public",
    "readonly",
    "require",
    "require_once",
    "return",
    "switch",
    "throw",
    "trait",
    "try",
    "unset",
    "var",
    "while",
    "xor",
    "yield",
];

const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Ellipsis),
    ("<=>", TokenKind::Operator),
    ("**=", TokenKind::Operator),
    ("===", TokenKind::Operator),
    ("!==", TokenKind::Operator),
    ("??=", TokenKind::Operator),
    ("?->", TokenKind::Operator),
    ("<<=", TokenKind::Operator),
    (">>=", TokenKind::Operator),
    ("::", TokenKind::DoubleColon),
    ("->", TokenKind::Operator),
    ("=>", TokenKind::Operator),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<>", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("??", TokenKind::Operator),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    (".=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("&=", TokenKind::Operator),
    ("|=", TokenKind::Operator),
    ("^=", TokenKind::Operator),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("**", TokenKind::Operator),
    ("(", TokenKind::OpenParen),
    (")", TokenKind::CloseParen),
    ("[", TokenKind::OpenBracket),
    ("]", TokenKind::CloseBracket),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
    ("?", TokenKind::Question),
    ("=", TokenKind::Equals),
    ("&", TokenKind::Ampersand),
    ("\\", TokenKind::NsSeparator),
];

/// Tokenize a PHP source file.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Lexer::new(source).lex();
    process_additional(&mut tokens);
    tokens
}

struct Lexer<'src> {
    source: &'src str,
    bytes: &'src [u8],
    pos: usize,
    line: usize,
    column: usize,
    in_php: bool,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            column: 1,
            in_php: false,
            tokens: Vec::new(),
        }
    }

    fn lex(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            if self.in_php {
                self.lex_php();
            } else {
                self.lex_inline_html();
            }
        }
        self.tokens
    }

    fn push(&mut self, kind: TokenKind, end: usize) {
        let end = end.clamp(self.pos + 1, self.bytes.len());
        let content = &self.source[self.pos..end];
        self.tokens.push(Token {
            kind,
            content: content.to_string(),
            line: self.line,
            column: self.column,
            offset: self.pos,
        });
        for &byte in content.as_bytes() {
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if byte & 0xC0 != 0x80 {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.bytes[self.pos..].starts_with(needle.as_bytes())
    }

    fn lex_inline_html(&mut self) {
        match self.find_open_tag(self.pos) {
            Some((start, len)) if start == self.pos => {
                self.push(TokenKind::OpenTag, start + len);
                self.in_php = true;
            }
            Some((start, _)) => self.push(TokenKind::InlineHtml, start),
            None => self.push(TokenKind::InlineHtml, self.bytes.len()),
        }
    }

    fn find_open_tag(&self, from: usize) -> Option<(usize, usize)> {
        let mut idx = from;
        while idx + 1 < self.bytes.len() {
            if self.bytes[idx] == b'<' && self.bytes[idx + 1] == b'?' {
                let rest = &self.bytes[idx + 2..];
                if rest.len() >= 3 && rest[..3].eq_ignore_ascii_case(b"php") {
                    return Some((idx, 5));
                }
                if rest.first() == Some(&b'=') {
                    return Some((idx, 3));
                }
                if rest.first().is_none_or(|byte| byte.is_ascii_whitespace()) {
                    return Some((idx, 2));
                }
            }
            idx += 1;
        }
        None
    }

    fn lex_php(&mut self) {
        let byte = self.bytes[self.pos];

        if is_whitespace(byte) {
            let end = self.scan_while(self.pos, is_whitespace);
            self.push(TokenKind::Whitespace, end);
            return;
        }

        if self.starts_with("?>") {
            let mut end = self.pos + 2;
            if self.bytes[end..].starts_with(b"\r\n") {
                end += 2;
            } else if self.bytes.get(end) == Some(&b'\n') {
                end += 1;
            }
            self.push(TokenKind::CloseTag, end);
            self.in_php = false;
            return;
        }

        if self.starts_with("#[") {
            self.push(TokenKind::AttributeOpen, self.pos + 2);
            return;
        }

        if byte == b'#' || self.starts_with("//") {
            let end = self.line_comment_end();
            self.push(TokenKind::Comment, end);
            return;
        }

        if self.starts_with("/*") {
            let end = find(self.bytes, self.pos + 2, b"*/").map_or(self.bytes.len(), |idx| idx + 2);
            let is_doc = self.starts_with("/**")
                && self.peek(3).is_some_and(|next| is_whitespace(next));
            let kind = if is_doc {
                TokenKind::DocComment
            } else {
                TokenKind::Comment
            };
            self.push(kind, end);
            return;
        }

        if byte == b'$' && self.peek(1).is_some_and(is_ident_start) {
            let end = self.scan_while(self.pos + 1, is_ident_char);
            self.push(TokenKind::Variable, end);
            return;
        }

        if is_ident_start(byte) {
            self.lex_word();
            return;
        }

        if byte.is_ascii_digit() || (byte == b'.' && self.peek(1).is_some_and(|b| b.is_ascii_digit())) {
            let end = self.scan_while(self.pos, |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
            self.push(TokenKind::Number, end);
            return;
        }

        if matches!(byte, b'\'' | b'"' | b'`') {
            let end = self.quoted_end(byte);
            self.push(TokenKind::ConstantString, end);
            return;
        }

        if self.starts_with("<<<") {
            if let Some(end) = self.heredoc_end() {
                self.push(TokenKind::Heredoc, end);
                return;
            }
        }

        for (text, kind) in PUNCTUATION {
            if self.starts_with(text) {
                self.push(*kind, self.pos + text.len());
                return;
            }
        }

        self.push(TokenKind::Operator, self.pos + 1);
    }

    fn lex_word(&mut self) {
        let end = self.scan_while(self.pos, is_ident_char);
        let lower = self.source[self.pos..end].to_ascii_lowercase();
        let kind = if self.follows_member_access() {
            TokenKind::Identifier
        } else {
            keyword_kind(&lower)
        };
        self.push(kind, end);
    }

    /// Names after `->`, `?->`, `::` or `function` are never keywords.
    fn follows_member_access(&self) -> bool {
        let Some(prev) = self.tokens.iter().rev().find(|token| !token.kind.is_empty()) else {
            return false;
        };
        match prev.kind {
            TokenKind::DoubleColon | TokenKind::Function => true,
            TokenKind::Operator => matches!(prev.content.as_str(), "->" | "?->"),
            _ => false,
        }
    }

    fn scan_while(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let mut end = from;
        while end < self.bytes.len() && pred(self.bytes[end]) {
            end += 1;
        }
        end
    }

    fn line_comment_end(&self) -> usize {
        let mut end = self.pos;
        while end < self.bytes.len() {
            if self.bytes[end] == b'\n' || self.bytes[end..].starts_with(b"?>") {
                break;
            }
            end += 1;
        }
        end
    }

    fn quoted_end(&self, quote: u8) -> usize {
        let mut idx = self.pos + 1;
        while idx < self.bytes.len() {
            match self.bytes[idx] {
                b'\\' => idx += 2,
                byte if byte == quote => return idx + 1,
                _ => idx += 1,
            }
        }
        self.bytes.len()
    }

    fn heredoc_end(&self) -> Option<usize> {
        let mut idx = self.scan_while(self.pos + 3, |b| b == b' ' || b == b'\t');
        let quote = match self.bytes.get(idx).copied() {
            Some(q) if q == b'\'' || q == b'"' => {
                idx += 1;
                Some(q)
            }
            _ => None,
        };
        if !self.bytes.get(idx).copied().is_some_and(is_ident_start) {
            return None;
        }
        let label_end = self.scan_while(idx, is_ident_char);
        let label = &self.bytes[idx..label_end];
        idx = label_end;
        if let Some(q) = quote {
            if self.bytes.get(idx) != Some(&q) {
                return None;
            }
            idx += 1;
        }
        if self.bytes[idx..].starts_with(b"\r\n") {
            idx += 2;
        } else if self.bytes.get(idx) == Some(&b'\n') {
            idx += 1;
        } else {
            return None;
        }

        let mut line_start = idx;
        while line_start < self.bytes.len() {
            let body = self.scan_while(line_start, |b| b == b' ' || b == b'\t');
            if self.bytes[body..].starts_with(label)
                && !self.bytes.get(body + label.len()).copied().is_some_and(is_ident_char)
            {
                return Some(body + label.len());
            }
            match find(self.bytes, line_start, b"\n") {
                Some(newline) => line_start = newline + 1,
                None => break,
            }
        }
        Some(self.bytes.len())
    }
}

fn keyword_kind(lower: &str) -> TokenKind {
    match lower {
        "function" => TokenKind::Function,
        "fn" => TokenKind::Fn,
        "array" => TokenKind::Array,
        "self" => TokenKind::SelfKeyword,
        "parent" => TokenKind::Parent,
        "callable" => TokenKind::Callable,
        "static" => TokenKind::Static,
        "use" => TokenKind::Use,
        word if RESERVED_WORDS.contains(&word) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte >= 0x80
}

fn is_ident_char(byte: u8) -> bool {
    is_ident_start(byte) || byte.is_ascii_digit()
}

fn find(haystack: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|idx| idx + from)
}

pub(crate) fn next_non_empty(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&idx| !tokens[idx].kind.is_empty())
}

pub(crate) fn prev_non_empty(tokens: &[Token], from: usize) -> Option<usize> {
    (0..=from).rev().find(|&idx| !tokens[idx].kind.is_empty())
}

/// Find the parenthesis that closes `opener`.
///
/// Brackets, braces and attributes count toward the nesting depth so that a
/// stray `)` inside them does not end the range early.
pub(crate) fn matching_close(tokens: &[Token], opener: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(opener) {
        match token.kind {
            TokenKind::OpenParen
            | TokenKind::OpenBracket
            | TokenKind::OpenBrace
            | TokenKind::AttributeOpen => depth += 1,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return (token.kind == TokenKind::CloseParen).then_some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate the `(` that opens a function-like signature.
pub(crate) fn signature_opener(tokens: &[Token], ptr: usize) -> Option<usize> {
    for (idx, token) in tokens.iter().enumerate().skip(ptr + 1) {
        match token.kind {
            TokenKind::OpenParen => return Some(idx),
            TokenKind::OpenBrace
            | TokenKind::CloseBrace
            | TokenKind::CloseParen
            | TokenKind::Semicolon
            | TokenKind::CloseTag => return None,
            _ => {}
        }
    }
    None
}

fn process_additional(tokens: &mut [Token]) {
    for idx in 0..tokens.len() {
        match tokens[idx].kind {
            TokenKind::Function => {
                if opens_anonymous_signature(tokens, idx) {
                    tokens[idx].kind = TokenKind::Closure;
                }
                process_signature(tokens, idx);
            }
            TokenKind::Fn => {
                if opens_anonymous_signature(tokens, idx) {
                    process_signature(tokens, idx);
                } else {
                    tokens[idx].kind = TokenKind::Identifier;
                }
            }
            _ => {}
        }
    }
}

fn opens_anonymous_signature(tokens: &[Token], ptr: usize) -> bool {
    let Some(mut next) = next_non_empty(tokens, ptr + 1) else {
        return false;
    };
    if tokens[next].kind == TokenKind::Ampersand {
        match next_non_empty(tokens, next + 1) {
            Some(after) => next = after,
            None => return false,
        }
    }
    tokens[next].kind == TokenKind::OpenParen
}

fn process_signature(tokens: &mut [Token], ptr: usize) {
    let Some(opener) = signature_opener(tokens, ptr) else {
        return;
    };
    let Some(closer) = matching_close(tokens, opener) else {
        return;
    };

    mark_parameter_types(tokens, opener, closer);

    let mut cursor = next_non_empty(tokens, closer + 1);
    if tokens[ptr].kind == TokenKind::Closure {
        if let Some(use_ptr) = cursor.filter(|&idx| tokens[idx].kind == TokenKind::Use) {
            cursor = next_non_empty(tokens, use_ptr + 1)
                .filter(|&idx| tokens[idx].kind == TokenKind::OpenParen)
                .and_then(|paren| matching_close(tokens, paren))
                .and_then(|close| next_non_empty(tokens, close + 1));
        }
    }

    if let Some(colon) = cursor.filter(|&idx| tokens[idx].kind == TokenKind::Colon) {
        mark_return_type(tokens, colon);
    }
}

fn mark_parameter_types(tokens: &mut [Token], opener: usize, closer: usize) {
    let mut openers: Vec<TokenKind> = Vec::new();
    let mut attribute_close = None;

    for idx in opener + 1..closer {
        match tokens[idx].kind {
            kind @ (TokenKind::OpenParen
            | TokenKind::OpenBracket
            | TokenKind::OpenBrace
            | TokenKind::AttributeOpen) => openers.push(kind),
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace => {
                if openers.pop() == Some(TokenKind::AttributeOpen) {
                    attribute_close = Some(idx);
                }
            }
            TokenKind::Array => {
                let is_literal = next_non_empty(tokens, idx + 1)
                    .is_some_and(|next| tokens[next].kind == TokenKind::OpenParen);
                if !is_literal {
                    tokens[idx].kind = TokenKind::ArrayHint;
                }
            }
            TokenKind::Question if openers.is_empty() => {
                let starts_param = prev_non_empty(tokens, idx - 1).is_some_and(|prev| {
                    prev == opener
                        || tokens[prev].kind == TokenKind::Comma
                        || Some(prev) == attribute_close
                        || tokens[prev].kind == TokenKind::Keyword
                });
                if starts_param {
                    tokens[idx].kind = TokenKind::Nullable;
                }
            }
            _ => {}
        }
    }
}

fn mark_return_type(tokens: &mut [Token], colon: usize) {
    let Some(mut ptr) = next_non_empty(tokens, colon + 1) else {
        return;
    };
    if tokens[ptr].kind == TokenKind::Question {
        tokens[ptr].kind = TokenKind::Nullable;
        match next_non_empty(tokens, ptr + 1) {
            Some(next) => ptr = next,
            None => return,
        }
    }

    if !tokens[ptr].kind.is_type_name() {
        return;
    }

    let compound = next_non_empty(tokens, ptr + 1).is_some_and(|next| {
        let token = &tokens[next];
        matches!(token.kind, TokenKind::NsSeparator | TokenKind::Ampersand)
            || (token.kind == TokenKind::Operator && token.content == "|")
    });
    if !compound {
        tokens[ptr].kind = TokenKind::ReturnType;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .into_iter()
            .filter(|token| !token.kind.is_empty())
            .map(|token| (token.kind, token.content))
            .collect()
    }

    fn kind_of(source: &str, content: &str) -> Vec<TokenKind> {
        tokenize(source)
            .into_iter()
            .filter(|token| token.content == content)
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn tokens_reproduce_source() {
        let source = "<html>\n<?php\n/** doc */\nfunction foo(?Int $a = 'x', array $b = array(1, 2)): VOID {\n    # hash\n    $s = <<<EOT\nbody $a\nEOT;\n    return \"q\\\"uoted\";\n}\n?>\ntrailer <?= $x ?>";
        let rebuilt: String = tokenize(source)
            .iter()
            .map(|token| token.content.as_str())
            .collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn text_before_open_tag_is_inline_html() {
        let tokens = tokenize("<p>hi</p><?php echo 1;");
        assert_eq!(tokens[0].kind, TokenKind::InlineHtml);
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        assert_eq!(tokens[1].content, "<?php");
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = tokenize("<?php\n  function foo() {}");
        let function = tokens
            .iter()
            .find(|token| token.kind == TokenKind::Function)
            .expect("function token");
        assert_eq!((function.line, function.column), (2, 3));
    }

    #[test]
    fn anonymous_function_is_closure() {
        assert_eq!(
            kind_of("<?php $f = function ($a) {};", "function"),
            vec![TokenKind::Closure]
        );
        assert_eq!(
            kind_of("<?php $f = function &() {};", "function"),
            vec![TokenKind::Closure]
        );
        assert_eq!(
            kind_of("<?php function named() {}", "function"),
            vec![TokenKind::Function]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let tokens = kinds("<?php FUNCTION foo(Self $a, CALLABLE $b, Array $c) {}");
        assert_eq!(tokens[1], (TokenKind::Function, "FUNCTION".to_string()));
        assert!(tokens.contains(&(TokenKind::SelfKeyword, "Self".to_string())));
        assert!(tokens.contains(&(TokenKind::Callable, "CALLABLE".to_string())));
        assert!(tokens.contains(&(TokenKind::ArrayHint, "Array".to_string())));
    }

    #[test]
    fn scalar_type_names_share_identifier_kind() {
        let tokens = kinds("<?php function foo(Int $a, MyClass $b) {}");
        assert!(tokens.contains(&(TokenKind::Identifier, "Int".to_string())));
        assert!(tokens.contains(&(TokenKind::Identifier, "MyClass".to_string())));
    }

    #[test]
    fn array_literal_in_default_is_not_a_hint() {
        let source = "<?php function foo(array $a = array(1)) {}";
        assert_eq!(
            kind_of(source, "array"),
            vec![TokenKind::ArrayHint, TokenKind::Array]
        );
    }

    #[test]
    fn nullable_marker_only_at_parameter_start() {
        let source = "<?php function foo(?int $a, $b = X ? 1 : 2) {}";
        assert_eq!(
            kind_of(source, "?"),
            vec![TokenKind::Nullable, TokenKind::Question]
        );
    }

    #[test]
    fn return_type_is_isolated() {
        let source = "<?php function foo(): ?Bool {}";
        assert_eq!(kind_of(source, "Bool"), vec![TokenKind::ReturnType]);
        assert_eq!(kind_of(source, "?"), vec![TokenKind::Nullable]);
    }

    #[test]
    fn closure_return_type_after_use_clause() {
        let source = "<?php $f = function ($a) use ($b): Int { return 1; };";
        assert_eq!(kind_of(source, "Int"), vec![TokenKind::ReturnType]);
    }

    #[test]
    fn arrow_function_return_type() {
        let source = "<?php $f = fn(int $x): Int => $x;";
        assert_eq!(kind_of(source, "Int"), vec![TokenKind::ReturnType]);
        assert_eq!(kind_of(source, "fn"), vec![TokenKind::Fn]);
    }

    #[test]
    fn qualified_return_type_is_left_alone() {
        let source = "<?php function foo(): \\Vendor\\Int {}";
        assert_eq!(kind_of(source, "Int"), vec![TokenKind::Identifier]);
        assert_eq!(kind_of(source, "Vendor"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn member_names_are_not_keywords() {
        let source = "<?php $a->function; Foo::array; function list() {}";
        assert_eq!(kind_of(source, "function")[0], TokenKind::Identifier);
        assert_eq!(kind_of(source, "array"), vec![TokenKind::Identifier]);
        assert_eq!(kind_of(source, "list"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn attributes_and_comments() {
        let source = "<?php function foo(#[Attr] ?Int $a /* c */, // tail\n $b) {}";
        let tokens = kinds(source);
        assert!(tokens.contains(&(TokenKind::AttributeOpen, "#[".to_string())));
        assert_eq!(kind_of(source, "?"), vec![TokenKind::Nullable]);
        assert_eq!(kind_of(source, "/* c */"), vec![TokenKind::Comment]);
    }

    #[test]
    fn unterminated_input_does_not_panic() {
        for source in [
            "<?php function foo(",
            "<?php function",
            "<?php 'open",
            "<?php /* open",
            "<?php $s = <<<EOT\nno end",
            "<?php function foo(): ",
            "<?php fn",
            "<?php function foo())) {",
        ] {
            let rebuilt: String = tokenize(source)
                .iter()
                .map(|token| token.content.as_str())
                .collect();
            assert_eq!(rebuilt, source);
        }
    }
}
