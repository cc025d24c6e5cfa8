use crate::preprocessor::token::Token;
use crate::source::SourceSpan;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LexError {
    #[error("Unexpected character: {ch:?}")]
    UnexpectedChar { ch: char, span: SourceSpan },
    #[error("Unterminated char literal")]
    UnterminatedChar { span: SourceSpan },
    #[error("Unterminated string literal")]
    UnterminatedString { span: SourceSpan },
}

impl LexError {
    pub fn span(&self) -> SourceSpan {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedChar { span } => *span,
            LexError::UnterminatedString { span } => *span,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum PreprocessorError {
    #[error("Not a valid macro")]
    InvalidDirective(Token),
    #[error("Expected macro name here")]
    ExpectedMacroName(Token),
    #[error("Expected parameter name here")]
    ExpectedParameterName(Token),
    #[error("Expected ( here")]
    ExpectedLeftParen(Token),
    #[error("Expected ) here")]
    ExpectedRightParen(Token),
    #[error("Unterminated block comment")]
    UnterminatedComment(Token),
    #[error("Invalid command-line definition: {0}")]
    InvalidDefine(String),
    #[error(transparent)]
    Lex(#[from] LexError),
}

impl PreprocessorError {
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            PreprocessorError::InvalidDirective(t)
            | PreprocessorError::ExpectedMacroName(t)
            | PreprocessorError::ExpectedParameterName(t)
            | PreprocessorError::ExpectedLeftParen(t)
            | PreprocessorError::ExpectedRightParen(t)
            | PreprocessorError::UnterminatedComment(t) => Some(t.span),
            PreprocessorError::InvalidDefine(_) => None,
            PreprocessorError::Lex(err) => Some(err.span()),
        }
    }
}
