use crate::preprocessor::error::PreprocessorError;
use crate::preprocessor::lexer::Lexer;
use crate::preprocessor::stream::TokenStream;
use crate::preprocessor::token::{NameId, Token, TokenKind};
use crate::source::SourceSpan;
use hashbrown::HashMap;
use log::{debug, warn};

pub mod error;
pub mod lexer;
pub mod stream;
pub mod token;

#[cfg(test)]
mod tests_preprocessor;

/// Represents a C macro.
#[derive(Debug, Clone)]
enum Macro {
    /// An object-like macro.
    Object {
        /// The tokens that replace the macro.
        tokens: Vec<Token>,
    },
    /// A function-like macro. `parameters` may be empty (`#define F() ...`).
    Function {
        /// The formal parameter names, in order.
        parameters: Vec<NameId>,
        /// The tokens that replace the macro.
        tokens: Vec<Token>,
    },
}

/// A C preprocessor supporting comments, `__LINE__` and `#define`.
///
/// The token sequence is rewritten in place: every expansion is spliced in at
/// the cursor and scanned again, so macros used inside a replacement (or an
/// argument) are expanded too. There is no recursion guard; a macro that
/// expands to itself never terminates.
#[derive(Debug, Default)]
pub struct Preprocessor {
    macros: HashMap<NameId, Macro>,
}

impl Preprocessor {
    /// Creates a new `Preprocessor`.
    pub fn new() -> Self {
        Preprocessor {
            macros: HashMap::new(),
        }
    }

    /// Defines an object-like macro from a `NAME` or `NAME=VALUE` string.
    ///
    /// # Arguments
    ///
    /// * `definition` - The macro definition string, as given to `-D`.
    pub fn define(&mut self, definition: &str) -> Result<(), PreprocessorError> {
        let (name, value) = definition.split_once('=').unwrap_or((definition, "1"));
        let is_identifier = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !is_identifier {
            return Err(PreprocessorError::InvalidDefine(definition.to_string()));
        }

        let mut tokens = Lexer::new(value)
            .tokenize()
            .map_err(|err| PreprocessorError::InvalidDefine(format!("{}: {}", definition, err)))?;
        trim_delimiters(&mut tokens);
        // The value is not part of the source buffer.
        for token in &mut tokens {
            token.span = SourceSpan::default();
            token.line = 0;
        }

        debug!("-D {} => {} tokens", name, tokens.len());
        self.register(NameId::new(name), Macro::Object { tokens });
        Ok(())
    }

    /// Whether a macro with this name is currently defined.
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(&NameId::new(name))
    }

    /// Runs the preprocessor over a token sequence.
    ///
    /// # Returns
    ///
    /// The fully expanded sequence with comments and directives removed. Delimiters are kept.
    pub fn preprocess(&mut self, tokens: Vec<Token>) -> Result<Vec<Token>, PreprocessorError> {
        let mut stream = TokenStream::new(tokens);

        while let Some(token) = stream.peek().copied() {
            match token.kind {
                TokenKind::Identifier if token.is("__LINE__") => {
                    if let Some(current) = stream.peek_mut() {
                        current.kind = TokenKind::DecimalNumber;
                        current.text = NameId::new(token.line.to_string());
                    }
                    stream.advance();
                }
                TokenKind::LineCommentBegin => {
                    let mut n = 1;
                    while stream.peek_nth(n).is_some_and(|t| !t.is_newline()) {
                        n += 1;
                    }
                    // The line break goes with the comment.
                    stream.remove(n + 1);
                }
                TokenKind::BlockCommentBegin => {
                    let n = block_comment_len(&stream, 0, token)?;
                    stream.remove(n);
                }
                TokenKind::Punct if token.is("#") => self.read_directive(&mut stream, token)?,
                TokenKind::Identifier => match self.macros.get(&token.text).cloned() {
                    Some(mac) => self.expand(&mut stream, token, mac)?,
                    None => {
                        stream.advance();
                    }
                },
                _ => {
                    stream.advance();
                }
            }
        }

        Ok(stream.into_tokens())
    }

    fn register(&mut self, name: NameId, mac: Macro) {
        // Later definitions replace earlier ones.
        if self.macros.insert(name, mac).is_some() {
            warn!("macro '{}' redefined", name);
        }
    }

    /// Reads a `#define` line at the cursor and removes it from the stream.
    fn read_directive(&mut self, stream: &mut TokenStream, hash: Token) -> Result<(), PreprocessorError> {
        let n = stream.skip_intra_line_delimiters(1);
        match stream.peek_nth(n) {
            Some(t) if t.kind == TokenKind::Identifier && t.is("define") => {}
            Some(t) => return Err(PreprocessorError::InvalidDirective(*t)),
            None => return Err(PreprocessorError::InvalidDirective(hash)),
        }

        let n = stream.skip_intra_line_delimiters(n + 1);
        let name = match stream.peek_nth(n) {
            Some(t) if t.kind == TokenKind::Identifier => *t,
            Some(t) => return Err(PreprocessorError::ExpectedMacroName(*t)),
            None => return Err(PreprocessorError::ExpectedMacroName(hash)),
        };

        // Only a `(` glued to the name starts a parameter list.
        let mut n = n + 1;
        let parameters = match stream.peek_nth(n) {
            Some(open) if open.is_punct("(") => {
                let (parameters, close) = read_parameters(stream, n, *open)?;
                n = close + 1;
                Some(parameters)
            }
            _ => None,
        };

        let (tokens, end) = read_replacement(stream, n)?;
        stream.remove(end);

        let mac = match parameters {
            None => {
                debug!("#define {} (object-like, {} tokens)", name, tokens.len());
                Macro::Object { tokens }
            }
            Some(parameters) => {
                debug!(
                    "#define {} ({} parameters, {} tokens)",
                    name,
                    parameters.len(),
                    tokens.len()
                );
                Macro::Function { parameters, tokens }
            }
        };
        self.register(name.text, mac);
        Ok(())
    }

    /// Replaces the macro invocation at the cursor with its expansion.
    ///
    /// The cursor is left on the first token of the expansion so it is rescanned.
    fn expand(&mut self, stream: &mut TokenStream, name: Token, mac: Macro) -> Result<(), PreprocessorError> {
        match mac {
            Macro::Object { tokens } => {
                debug!("line {}: expanding {}", name.line, name);
                stream.remove_current();
                stream.insert(tokens);
            }
            Macro::Function { parameters, tokens } => {
                let open = stream.skip_intra_line_delimiters(1);
                let paren = match stream.peek_nth(open) {
                    Some(t) if t.is_punct("(") => *t,
                    Some(t) => return Err(PreprocessorError::ExpectedLeftParen(*t)),
                    None => return Err(PreprocessorError::ExpectedLeftParen(name)),
                };

                let (args, close) = read_arguments(stream, open, paren, parameters.len())?;
                debug!("line {}: expanding {}({} arguments)", name.line, name, args.len());
                stream.remove(close + 1);
                stream.insert(substitute(&tokens, &parameters, &args));
            }
        }
        Ok(())
    }
}

/// Number of tokens from `from` through the `*/` closing the comment that starts there.
fn block_comment_len(stream: &TokenStream, from: usize, begin: Token) -> Result<usize, PreprocessorError> {
    let mut n = from + 1;
    loop {
        match stream.peek_nth(n) {
            Some(t) if t.kind == TokenKind::BlockCommentEnd => return Ok(n + 1 - from),
            Some(_) => n += 1,
            None => return Err(PreprocessorError::UnterminatedComment(begin)),
        }
    }
}

/// Reads a formal parameter list whose `(` is at `open_at`.
///
/// Returns the parameter names and the position of the closing `)`.
fn read_parameters(
    stream: &TokenStream,
    open_at: usize,
    open: Token,
) -> Result<(Vec<NameId>, usize), PreprocessorError> {
    let mut parameters = Vec::new();
    let mut n = stream.skip_intra_line_delimiters(open_at + 1);

    if !stream.peek_nth(n).is_some_and(|t| t.is_punct(")")) {
        loop {
            match stream.peek_nth(n) {
                Some(t) if t.kind == TokenKind::Identifier => parameters.push(t.text),
                Some(t) => return Err(PreprocessorError::ExpectedParameterName(*t)),
                None => return Err(PreprocessorError::ExpectedRightParen(open)),
            }
            n = stream.skip_intra_line_delimiters(n + 1);
            if !stream.peek_nth(n).is_some_and(|t| t.is_punct(",")) {
                break;
            }
            n = stream.skip_intra_line_delimiters(n + 1);
        }
    }

    match stream.peek_nth(n) {
        Some(t) if t.is_punct(")") => Ok((parameters, n)),
        Some(t) => Err(PreprocessorError::ExpectedRightParen(*t)),
        None => Err(PreprocessorError::ExpectedRightParen(open)),
    }
}

/// Collects the replacement list starting at `from`, up to the end of the line.
///
/// Returns the body and the number of tokens (from the cursor) the whole
/// directive occupies, including the terminating newline.
fn read_replacement(stream: &TokenStream, from: usize) -> Result<(Vec<Token>, usize), PreprocessorError> {
    let mut body = Vec::new();
    let mut n = stream.skip_intra_line_delimiters(from);
    let mut in_line_comment = false;

    while let Some(t) = stream.peek_nth(n).copied() {
        if t.is_newline() {
            n += 1;
            break;
        }
        match t.kind {
            TokenKind::LineCommentBegin => in_line_comment = true,
            TokenKind::BlockCommentBegin if !in_line_comment => {
                n += block_comment_len(stream, n, t)? - 1;
            }
            _ if !in_line_comment => body.push(t),
            _ => {}
        }
        n += 1;
    }

    trim_delimiters(&mut body);
    Ok((body, n))
}

/// Reads `count` arguments of the call whose `(` is at `open_at`.
///
/// Arguments are split on `,` at parenthesis depth zero. Returns the argument
/// runs and the position of the closing `)`.
fn read_arguments(
    stream: &TokenStream,
    open_at: usize,
    open: Token,
    count: usize,
) -> Result<(Vec<Vec<Token>>, usize), PreprocessorError> {
    // The error for a call cut off by the end of input points at the last token read.
    let mut last = open;
    let mut args = Vec::with_capacity(count);
    let mut n = open_at + 1;

    for _ in 0..count {
        n = stream.skip_intra_line_delimiters(n);
        let mut run = Vec::new();
        let mut depth = 0usize;
        loop {
            let t = match stream.peek_nth(n) {
                Some(t) => *t,
                None => return Err(PreprocessorError::ExpectedRightParen(last)),
            };
            if depth == 0 && (t.is_punct(",") || t.is_punct(")")) {
                break;
            }
            if t.is_punct("(") {
                depth += 1;
            } else if t.is_punct(")") {
                depth -= 1;
            }
            run.push(t);
            last = t;
            n += 1;
        }
        trim_delimiters(&mut run);
        args.push(run);

        if stream.peek_nth(n).is_some_and(|t| t.is_punct(")")) {
            break;
        }
        n += 1;
    }

    n = stream.skip_intra_line_delimiters(n);
    match stream.peek_nth(n) {
        Some(t) if t.is_punct(")") => Ok((args, n)),
        Some(t) => Err(PreprocessorError::ExpectedRightParen(*t)),
        None => Err(PreprocessorError::ExpectedRightParen(last)),
    }
}

/// Copies `body`, replacing each formal parameter with the tokens bound to it.
///
/// Formals without a matching argument are left as they are.
fn substitute(body: &[Token], parameters: &[NameId], args: &[Vec<Token>]) -> Vec<Token> {
    let mut out = Vec::with_capacity(body.len());
    for t in body {
        let bound = (t.kind == TokenKind::Identifier)
            .then(|| parameters.iter().position(|p| *p == t.text))
            .flatten()
            .and_then(|i| args.get(i));
        match bound {
            Some(arg) => out.extend_from_slice(arg),
            None => out.push(*t),
        }
    }
    out
}

fn trim_delimiters(tokens: &mut Vec<Token>) {
    while tokens.last().is_some_and(|t| t.kind == TokenKind::Delimiter) {
        tokens.pop();
    }
    let leading = tokens
        .iter()
        .take_while(|t| t.kind == TokenKind::Delimiter)
        .count();
    tokens.drain(..leading);
}
