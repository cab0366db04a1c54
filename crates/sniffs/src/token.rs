#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    InlineHtml,
    OpenTag,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,
    AttributeOpen,

    Variable,
    Identifier,
    NsSeparator,
    Number,
    ConstantString,
    Heredoc,

    // Keywords.
    Function,
    Closure,
    Fn,
    Array,
    ArrayHint,
    SelfKeyword,
    Parent,
    Callable,
    Static,
    Use,
    Keyword,

    // Type declarations.
    ReturnType,
    Nullable,

    // Punctuation.
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,
    Colon,
    DoubleColon,
    Question,
    Equals,
    Ampersand,
    Ellipsis,
    Operator,
}

impl TokenKind {
    /// Tokens that carry no meaning for the grammar.
    pub fn is_empty(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }

    /// Kinds that can spell a type name in a declaration.
    pub fn is_type_name(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Array
                | TokenKind::ArrayHint
                | TokenKind::SelfKeyword
                | TokenKind::Parent
                | TokenKind::Callable
                | TokenKind::Static
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::InlineHtml => "T_INLINE_HTML",
            TokenKind::OpenTag => "T_OPEN_TAG",
            TokenKind::CloseTag => "T_CLOSE_TAG",
            TokenKind::Whitespace => "T_WHITESPACE",
            TokenKind::Comment => "T_COMMENT",
            TokenKind::DocComment => "T_DOC_COMMENT",
            TokenKind::AttributeOpen => "T_ATTRIBUTE",
            TokenKind::Variable => "T_VARIABLE",
            TokenKind::Identifier => "T_STRING",
            TokenKind::NsSeparator => "T_NS_SEPARATOR",
            TokenKind::Number => "T_LNUMBER",
            TokenKind::ConstantString => "T_CONSTANT_ENCAPSED_STRING",
            TokenKind::Heredoc => "T_HEREDOC",
            TokenKind::Function => "T_FUNCTION",
            TokenKind::Closure => "T_CLOSURE",
            TokenKind::Fn => "T_FN",
            TokenKind::Array => "T_ARRAY",
            TokenKind::ArrayHint => "T_ARRAY_HINT",
            TokenKind::SelfKeyword => "T_SELF",
            TokenKind::Parent => "T_PARENT",
            TokenKind::Callable => "T_CALLABLE",
            TokenKind::Static => "T_STATIC",
            TokenKind::Use => "T_USE",
            TokenKind::Keyword => "T_KEYWORD",
            TokenKind::ReturnType => "T_RETURN_TYPE",
            TokenKind::Nullable => "T_NULLABLE",
            TokenKind::OpenParen => "T_OPEN_PARENTHESIS",
            TokenKind::CloseParen => "T_CLOSE_PARENTHESIS",
            TokenKind::OpenBracket => "T_OPEN_SQUARE_BRACKET",
            TokenKind::CloseBracket => "T_CLOSE_SQUARE_BRACKET",
            TokenKind::OpenBrace => "T_OPEN_CURLY_BRACKET",
            TokenKind::CloseBrace => "T_CLOSE_CURLY_BRACKET",
            TokenKind::Comma => "T_COMMA",
            TokenKind::Semicolon => "T_SEMICOLON",
            TokenKind::Colon => "T_COLON",
            TokenKind::DoubleColon => "T_DOUBLE_COLON",
            TokenKind::Question => "T_INLINE_THEN",
            TokenKind::Equals => "T_EQUAL",
            TokenKind::Ampersand => "T_BITWISE_AND",
            TokenKind::Ellipsis => "T_ELLIPSIS",
            TokenKind::Operator => "T_OPERATOR",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    /// 1-indexed line of the first byte.
    pub line: usize,
    /// 1-indexed column of the first byte.
    pub column: usize,
    /// Byte offset into the original source.
    pub offset: usize,
}

impl Token {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
