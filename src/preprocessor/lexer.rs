use crate::common::KeywordKind;
use crate::preprocessor::error::LexError;
use crate::preprocessor::token::{Token, TokenKind};
use crate::source::SourceSpan;
use std::iter::Peekable;
use std::str::CharIndices;

/// Punctuators ordered so that the longest spelling is tried first.
const PUNCTUATORS: &[&str] = &[
    "<<=", ">>=", "...", "->", "++", "--", "<<", ">>", "<=", ">=", "==", "!=", "&&", "||", "+=",
    "-=", "*=", "/=", "%=", "&=", "^=", "|=", "##", "[", "]", "(", ")", "{", "}", ".", "&", "*",
    "+", "-", "~", "!", "/", "%", "<", ">", "^", "|", "?", ":", ";", "=", ",", "#",
];

/// Splits a source buffer into tokens, keeping delimiters and comment markers.
pub struct Lexer<'a> {
    src: &'a str,
    input: Peekable<CharIndices<'a>>,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            input: src.char_indices().peekable(),
            line: 1,
        }
    }

    /// Tokenizes the whole buffer.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            // Comment bodies are swallowed whole so their contents never reach the literal rules.
            match token.kind {
                TokenKind::LineCommentBegin => {
                    tokens.push(token);
                    if let Some(body) = self.line_comment_body() {
                        tokens.push(body);
                    }
                }
                TokenKind::BlockCommentBegin => {
                    tokens.push(token);
                    tokens.extend(self.block_comment_rest());
                }
                _ => tokens.push(token),
            }
        }
        Ok(tokens)
    }

    fn offset(&mut self) -> usize {
        self.input.peek().map_or(self.src.len(), |&(i, _)| i)
    }

    fn make(&self, kind: TokenKind, start: usize, end: usize, line: u32) -> Token {
        Token::new(
            kind,
            &self.src[start..end],
            SourceSpan::new(start as u32, end as u32),
            line,
        )
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        while let Some(&(_, c)) = self.input.peek() {
            if !pred(c) {
                break;
            }
            self.input.next();
        }
        self.offset()
    }

    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let (start, c) = match self.input.next() {
            Some(pair) => pair,
            None => return Ok(None),
        };
        let line = self.line;

        let token = match c {
            '\n' => {
                self.line += 1;
                self.make(TokenKind::Delimiter, start, start + 1, line)
            }
            ' ' | '\t' | '\r' | '\x0b' | '\x0c' => {
                let end = self.eat_while(|c| matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c'));
                self.make(TokenKind::Delimiter, start, end, line)
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let end = self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let kind = match self.src[start..end].parse::<KeywordKind>() {
                    Ok(keyword) => TokenKind::Keyword(keyword),
                    Err(()) => TokenKind::Identifier,
                };
                self.make(kind, start, end, line)
            }
            _ if c.is_ascii_digit() => {
                let end = self.eat_while(|c| c.is_ascii_digit());
                let kind = if c == '0' && end - start > 1 {
                    TokenKind::OctalNumber
                } else {
                    TokenKind::DecimalNumber
                };
                self.make(kind, start, end, line)
            }
            '\'' => self.quoted(start, '\'', TokenKind::Char)?,
            '"' => self.quoted(start, '"', TokenKind::String)?,
            _ => {
                let src = self.src;
                let rest = &src[start..];
                if rest.starts_with("//") {
                    self.input.next();
                    self.make(TokenKind::LineCommentBegin, start, start + 2, line)
                } else if rest.starts_with("/*") {
                    self.input.next();
                    self.make(TokenKind::BlockCommentBegin, start, start + 2, line)
                } else if let Some(punct) = PUNCTUATORS.iter().find(|p| rest.starts_with(**p)) {
                    for _ in 1..punct.len() {
                        self.input.next();
                    }
                    self.make(TokenKind::Punct, start, start + punct.len(), line)
                } else {
                    let span = SourceSpan::new(start as u32, (start + c.len_utf8()) as u32);
                    return Err(LexError::UnexpectedChar { ch: c, span });
                }
            }
        };
        Ok(Some(token))
    }

    /// Reads a char or string literal whose opening quote was already consumed.
    fn quoted(&mut self, start: usize, quote: char, kind: TokenKind) -> Result<Token, LexError> {
        let line = self.line;
        loop {
            match self.input.next() {
                Some((_, '\\')) => {
                    if let Some((_, '\n')) = self.input.next() {
                        self.line += 1;
                    }
                }
                Some((i, c)) if c == quote => return Ok(self.make(kind, start, i + 1, line)),
                Some((_, '\n')) | None => {
                    let span = SourceSpan::new(start as u32, start as u32 + 1);
                    return Err(if quote == '"' {
                        LexError::UnterminatedString { span }
                    } else {
                        LexError::UnterminatedChar { span }
                    });
                }
                Some(_) => {}
            }
        }
    }

    /// Everything up to (not including) the next newline.
    fn line_comment_body(&mut self) -> Option<Token> {
        let start = self.offset();
        let end = self.eat_while(|c| c != '\n');
        (end > start).then(|| self.make(TokenKind::CommentBody, start, end, self.line))
    }

    /// The comment text and the closing `*/`, if the comment is terminated.
    fn block_comment_rest(&mut self) -> Vec<Token> {
        let start = self.offset();
        let line = self.line;
        let close = self.src[start..].find("*/").map(|n| start + n);
        let body_end = close.unwrap_or(self.src.len());

        while self.offset() < body_end {
            if let Some((_, '\n')) = self.input.next() {
                self.line += 1;
            }
        }

        let mut tokens = Vec::new();
        if body_end > start {
            tokens.push(self.make(TokenKind::CommentBody, start, body_end, line));
        }
        if let Some(close) = close {
            self.input.next();
            self.input.next();
            tokens.push(self.make(TokenKind::BlockCommentEnd, close, close + 2, self.line));
        }
        tokens
    }
}
