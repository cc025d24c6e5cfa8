use crate::preprocessor::token::Token;
use crate::source::SourceSpan;
use crate::types::TypeError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParserError {
    #[error("Expected {expected} here")]
    UnexpectedToken { token: Token, expected: &'static str },
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("Unexpected token")]
    TrailingToken(Token),
    #[error("Expected expression after this token")]
    ExpectedExpression(Token),
    #[error("Invalid number literal")]
    InvalidNumber(Token),
    #[error("Declaration without a name")]
    MissingName(Token),
    #[error("Function definition needs a function declarator")]
    NotAFunction(Token),
    #[error("{source}")]
    Type { source: TypeError, token: Token },
}

impl ParserError {
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            ParserError::UnexpectedToken { token, .. }
            | ParserError::TrailingToken(token)
            | ParserError::ExpectedExpression(token)
            | ParserError::InvalidNumber(token)
            | ParserError::MissingName(token)
            | ParserError::NotAFunction(token)
            | ParserError::Type { token, .. } => Some(token.span),
            ParserError::UnexpectedEof { .. } => None,
        }
    }
}
