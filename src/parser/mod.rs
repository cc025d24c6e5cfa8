use crate::parser::ast::{FunctionDef, TranslationUnit};
use crate::parser::error::ParserError;
use crate::preprocessor::token::{KeywordKind, Token, TokenKind};
use crate::types::get_rvalue_type;
use log::{debug, trace};

pub mod ast;
pub mod declarations;
pub mod error;
pub mod expressions;
pub mod statements;

#[cfg(test)]
mod tests_parser;

/// A predictive recursive-descent parser over a fully expanded token sequence.
///
/// Every rule function returns `Ok(None)` when the construct does not start at
/// the current token, and an error once it has started but cannot be completed.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Creates a new `Parser`.
    ///
    /// # Arguments
    ///
    /// * `tokens` - The preprocessed token sequence. Delimiters are dropped here.
    pub fn new(tokens: Vec<Token>) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|token| token.kind != TokenKind::Delimiter)
            .collect();
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parses a translation unit: function definitions and file-scope declarations.
    pub fn parse(&mut self) -> Result<TranslationUnit, ParserError> {
        let mut unit = TranslationUnit::default();

        while let Some(decl) = declarations::parse_declaration_body(self)? {
            if self.consume_punct(";").is_some() {
                let declared = declarations::declared_type(&decl)?;
                let name = declared
                    .name
                    .ok_or(ParserError::MissingName(decl.spec.token()))?;
                trace!("top-level declaration {}: {}", name, declared.ty);
                unit.symbols.push(name.text, get_rvalue_type(&declared.ty).clone());
                continue;
            }

            let Some(body) = statements::parse_compound_statement(self)? else {
                return Err(match self.peek() {
                    Some(token) => ParserError::TrailingToken(*token),
                    None => ParserError::UnexpectedEof {
                        expected: "; or function body",
                    },
                });
            };

            let declared = declarations::declared_type(&decl)?;
            let name = declared
                .name
                .ok_or(ParserError::MissingName(decl.spec.token()))?;
            if !declared.ty.is_function() {
                return Err(ParserError::NotAFunction(name));
            }
            debug!("parsed function {} ({} items)", name, body.items.len());
            unit.symbols.push(name.text, declared.ty.clone());
            unit.functions.push(FunctionDef {
                name,
                ty: declared.ty,
                decl,
                body,
            });
        }

        if let Some(token) = self.peek() {
            return Err(ParserError::TrailingToken(*token));
        }
        Ok(unit)
    }

    /// Whether every token has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Consumes and returns the current token.
    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).copied()?;
        self.position += 1;
        Some(token)
    }

    /// Consumes the current token if it has the given kind.
    fn consume_kind(&mut self, kind: TokenKind) -> Option<Token> {
        match self.peek() {
            Some(token) if token.kind == kind => self.next_token(),
            _ => None,
        }
    }

    fn consume_keyword(&mut self, keyword: KeywordKind) -> Option<Token> {
        self.consume_kind(TokenKind::Keyword(keyword))
    }

    /// Consumes the current token if it is the punctuator `text`.
    fn consume_punct(&mut self, text: &str) -> Option<Token> {
        match self.peek() {
            Some(token) if token.is_punct(text) => self.next_token(),
            _ => None,
        }
    }

    /// Expects a specific punctuator.
    fn expect_punct(&mut self, text: &'static str) -> Result<Token, ParserError> {
        self.consume_punct(text).ok_or_else(|| self.expected(text))
    }

    /// The error for a missing `what` at the current position.
    fn expected(&self, what: &'static str) -> ParserError {
        match self.peek() {
            Some(token) => ParserError::UnexpectedToken {
                token: *token,
                expected: what,
            },
            None => ParserError::UnexpectedEof { expected: what },
        }
    }
}
