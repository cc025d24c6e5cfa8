use crate::{
    parser::error::ParserError,
    preprocessor::error::{LexError, PreprocessorError},
    source::{SourceFile, SourceSpan},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Preprocessor(#[from] PreprocessorError),
    #[error("{0}")]
    Parser(#[from] ParserError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            Error::Lex(err) => Some(err.span()),
            Error::Preprocessor(err) => err.span(),
            Error::Parser(err) => err.span(),
            Error::Io(_) => None,
        }
    }
}

/// A fatal diagnostic, optionally anchored on a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub msg: String,
    pub span: Option<SourceSpan>,
}

impl Report {
    pub fn new(msg: String, span: Option<SourceSpan>) -> Self {
        Self { msg, span }
    }

    /// Renders the report against the buffer its span points into.
    ///
    /// With a usable span the source line is shown with the token underlined:
    ///
    /// ```text
    /// Line 2:
    ///   return 1 }
    ///            ^
    /// Error: Expected ; here
    /// ```
    pub fn render(&self, file: Option<&SourceFile>) -> String {
        let anchored = self
            .span
            .zip(file)
            .filter(|(span, file)| !span.is_empty() && file.contains(*span));

        let Some((span, file)) = anchored else {
            return format!("Error: {}\n", self.msg);
        };

        let (line, col) = file.lookup_line_col(span.start);
        let text = file.line_text(span.start);
        let shown: String = text
            .chars()
            .map(|c| if c <= ' ' { ' ' } else { c })
            .collect();
        // Caret columns count chars, not bytes.
        let start = (col - 1) as usize;
        let end = (start + span.len() as usize).min(text.len());
        let indent = text.get(..start).map_or(start, |s| s.chars().count());
        let width = text
            .get(start..end)
            .map_or(1, |s| s.chars().count())
            .max(1);

        format!(
            "Line {}:\n{}\n{}{}\nError: {}\n",
            line,
            shown,
            " ".repeat(indent),
            "^".repeat(width),
            self.msg
        )
    }
}

impl From<&Error> for Report {
    fn from(err: &Error) -> Self {
        Report::new(err.to_string(), err.span())
    }
}

/// Prints a report to stderr.
pub fn report(report: &Report, file: Option<&SourceFile>) {
    eprint!("{}", report.render(file));
}
