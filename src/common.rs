use std::fmt;
use std::str::FromStr;

/// Represents the C keywords recognized by the lexer.
///
/// Only `int`, `char`, `void`, `struct`, `sizeof`, `if` and `return` take part
/// in the grammar; the rest are reserved so they never parse as identifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeywordKind {
    Break,
    Char,
    Const,
    Continue,
    Else,
    For,
    If,
    Int,
    Return,
    Sizeof,
    Struct,
    Void,
    While,
}

impl FromStr for KeywordKind {
    type Err = ();

    /// Converts a string slice to a `KeywordKind`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `KeywordKind` if the string is a valid keyword, or an empty error if not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "break" => Ok(KeywordKind::Break),
            "char" => Ok(KeywordKind::Char),
            "const" => Ok(KeywordKind::Const),
            "continue" => Ok(KeywordKind::Continue),
            "else" => Ok(KeywordKind::Else),
            "for" => Ok(KeywordKind::For),
            "if" => Ok(KeywordKind::If),
            "int" => Ok(KeywordKind::Int),
            "return" => Ok(KeywordKind::Return),
            "sizeof" => Ok(KeywordKind::Sizeof),
            "struct" => Ok(KeywordKind::Struct),
            "void" => Ok(KeywordKind::Void),
            "while" => Ok(KeywordKind::While),
            _ => Err(()),
        }
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KeywordKind::Break => write!(f, "break"),
            KeywordKind::Char => write!(f, "char"),
            KeywordKind::Const => write!(f, "const"),
            KeywordKind::Continue => write!(f, "continue"),
            KeywordKind::Else => write!(f, "else"),
            KeywordKind::For => write!(f, "for"),
            KeywordKind::If => write!(f, "if"),
            KeywordKind::Int => write!(f, "int"),
            KeywordKind::Return => write!(f, "return"),
            KeywordKind::Sizeof => write!(f, "sizeof"),
            KeywordKind::Struct => write!(f, "struct"),
            KeywordKind::Void => write!(f, "void"),
            KeywordKind::While => write!(f, "while"),
        }
    }
}
