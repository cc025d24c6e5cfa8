pub use crate::common::KeywordKind;
use crate::source::SourceSpan;
use std::fmt;

/// Interned token and identifier text.
pub type NameId = symbol_table::GlobalSymbol;

/// Represents a token in the C language.
///
/// Tokens are plain values: duplicating one for a macro expansion produces an
/// independent copy that still points at the defining source span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The spelling of the token.
    pub text: NameId,
    /// The span of the token in the source buffer.
    pub span: SourceSpan,
    /// The line the token originated on (1-based).
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, text: &str, span: SourceSpan, line: u32) -> Self {
        Token {
            kind,
            text: NameId::new(text),
            span,
            line,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.text.as_str()
    }

    /// Compares the token spelling, whatever its kind.
    pub fn is(&self, text: &str) -> bool {
        self.as_str() == text
    }

    pub fn is_punct(&self, text: &str) -> bool {
        self.kind == TokenKind::Punct && self.is(text)
    }

    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Delimiter && self.is("\n")
    }

    /// A delimiter that does not end the logical line.
    pub fn is_intra_line_delimiter(&self) -> bool {
        self.kind == TokenKind::Delimiter && !self.is("\n")
    }
}

/// The kind of a token.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword(KeywordKind),
    DecimalNumber,
    OctalNumber,
    Char,
    String,
    /// An operator or separator; the spelling is in `Token::text`.
    Punct,
    /// Whitespace. A newline is always a delimiter of its own.
    Delimiter,
    LineCommentBegin,
    BlockCommentBegin,
    BlockCommentEnd,
    /// The text between comment markers.
    CommentBody,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Keyword(k) => write!(f, "keyword '{}'", k),
            TokenKind::DecimalNumber => write!(f, "decimal number"),
            TokenKind::OctalNumber => write!(f, "octal number"),
            TokenKind::Char => write!(f, "char literal"),
            TokenKind::String => write!(f, "string literal"),
            TokenKind::Punct => write!(f, "punctuator"),
            TokenKind::Delimiter => write!(f, "delimiter"),
            TokenKind::LineCommentBegin => write!(f, "'//'"),
            TokenKind::BlockCommentBegin => write!(f, "'/*'"),
            TokenKind::BlockCommentEnd => write!(f, "'*/'"),
            TokenKind::CommentBody => write!(f, "comment"),
        }
    }
}
