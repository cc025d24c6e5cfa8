//! Helpers shared by unit tests and the integration tests under `tests/`.

use crate::compiler::{Cli, Compiler, CompilerError, Output};
use crate::error::Error;
use crate::parser::Parser;
use crate::parser::ast::TranslationUnit;
use crate::preprocessor::Preprocessor;
use crate::preprocessor::error::PreprocessorError;
use crate::preprocessor::lexer::Lexer;
use crate::preprocessor::token::{Token, TokenKind};

/// Creates a new preprocessor with the given `-D` definitions applied.
pub fn create_preprocessor(defines: &[&str]) -> Result<Preprocessor, PreprocessorError> {
    let mut preprocessor = Preprocessor::new();
    for def in defines {
        preprocessor.define(def)?;
    }
    Ok(preprocessor)
}

/// Lexes and preprocesses `src`.
pub fn preprocess_source(src: &str) -> Result<Vec<Token>, PreprocessorError> {
    let tokens = Lexer::new(src).tokenize()?;
    Preprocessor::new().preprocess(tokens)
}

/// Runs the whole front end over `src`.
pub fn parse_source(src: &str) -> Result<TranslationUnit, Error> {
    let tokens = preprocess_source(src)?;
    Ok(Parser::new(tokens).parse()?)
}

/// The non-delimiter token texts joined by single spaces, e.g. `1 + 2 ;`.
pub fn visible_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Delimiter)
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles `input` as a virtual file with default options and returns the rendered diagnostic.
pub fn compile_and_get_error(input: &str, filename: &str) -> Result<Output, String> {
    let mut compiler = Compiler::new(Cli::default());
    compiler
        .run_virtual_file(filename, input)
        .map_err(|CompilerError { reports }| {
            let file = crate::source::SourceFile::new(filename, input.to_string());
            reports
                .iter()
                .map(|r| r.render(Some(&file)))
                .collect::<String>()
        })
}
