//! The token sequence rewritten by the preprocessor.
//!
//! `TokenStream` is a gap buffer with the cursor at the gap: tokens already
//! scanned sit on the left in order, the unscanned rest sits on the right in
//! reverse so that the token under the cursor is the last element. Deleting
//! at the cursor, inserting a run at the cursor and advancing therefore cost
//! time proportional to the edited run, never to the whole sequence.

use crate::preprocessor::token::Token;

#[derive(Debug, Default, Clone)]
pub struct TokenStream {
    scanned: Vec<Token>,
    /// Unscanned tokens, last element is the current one.
    rest: Vec<Token>,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.reverse();
        TokenStream {
            scanned: Vec::new(),
            rest: tokens,
        }
    }

    /// The token under the cursor.
    pub fn peek(&self) -> Option<&Token> {
        self.rest.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut Token> {
        self.rest.last_mut()
    }

    /// The token `n` positions after the cursor (`0` is the current token).
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.rest.len().checked_sub(n + 1).map(|i| &self.rest[i])
    }

    /// Index (relative to the cursor) of the first token at or after `from`
    /// that is not a delimiter inside the current logical line.
    pub fn skip_intra_line_delimiters(&self, from: usize) -> usize {
        let mut n = from;
        while self.peek_nth(n).is_some_and(|t| t.is_intra_line_delimiter()) {
            n += 1;
        }
        n
    }

    /// Moves the cursor past the current token.
    pub fn advance(&mut self) -> Option<Token> {
        let token = self.rest.pop()?;
        self.scanned.push(token);
        Some(token)
    }

    /// Deletes the token under the cursor.
    pub fn remove_current(&mut self) -> Option<Token> {
        self.rest.pop()
    }

    /// Deletes `count` tokens starting at the cursor.
    pub fn remove(&mut self, count: usize) {
        let keep = self.rest.len().saturating_sub(count);
        self.rest.truncate(keep);
    }

    /// Inserts `run` at the cursor; the cursor ends up on the first inserted token.
    pub fn insert(&mut self, run: Vec<Token>) {
        self.rest.extend(run.into_iter().rev());
    }

    pub fn into_tokens(self) -> Vec<Token> {
        let TokenStream { mut scanned, rest } = self;
        scanned.extend(rest.into_iter().rev());
        scanned
    }
}
