use crate::dumper::Dumper;
use crate::error::{Error, Report};
use crate::parser::Parser;
use crate::parser::ast::TranslationUnit;
use crate::preprocessor::Preprocessor;
use crate::preprocessor::lexer::Lexer;
use crate::preprocessor::token::Token;
use crate::source::SourceFile;
use clap::Parser as ClapParser;
use log::debug;
use std::fs;
use std::io::{self, Read};

/// Command-line arguments for the compiler front end.
#[derive(ClapParser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The input C file; reads stdin when absent or `-`
    #[arg()]
    pub input_file: Option<String>,

    /// Output file for preprocessed text
    #[arg(short, long = "output")]
    pub output_file: Option<String>,

    /// Preprocess only
    #[arg(short = 'E')]
    pub preprocess_only: bool,

    /// Define a macro (NAME or NAME=VALUE)
    #[arg(short = 'D', long)]
    pub define: Vec<String>,

    /// Print the AST and the top-level symbol table to stderr
    #[arg(long)]
    pub dump_ast: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a successful run produced.
#[derive(Debug)]
pub enum Output {
    /// The expanded token sequence serialised back to text (`-E`).
    Preprocessed(String),
    Parsed(TranslationUnit),
}

pub struct Compiler {
    cli: Cli,
    file: Option<SourceFile>,
}

#[derive(Debug)]
pub struct CompilerError {
    pub reports: Vec<Report>,
}

impl CompilerError {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }
}

impl From<Error> for CompilerError {
    fn from(err: Error) -> Self {
        CompilerError::new(vec![Report::from(&err)])
    }
}

impl Compiler {
    pub fn new(cli: Cli) -> Self {
        Self { cli, file: None }
    }

    /// Prints reports to stderr, quoting the source when a report points into it.
    pub fn print_diagnostic(&self, reports: &[Report]) {
        for r in reports {
            crate::error::report(r, self.file.as_ref());
        }
    }

    /// ignore input file from CLI and use this filename & content
    pub fn run_virtual_file(&mut self, path: &str, content: &str) -> Result<Output, CompilerError> {
        self.file = Some(SourceFile::new(path, content.to_string()));
        self.compile()
    }

    /// drive compiler process from cli
    pub fn run(&mut self) -> Result<Output, CompilerError> {
        debug!("Verbose output enabled");

        let (path, content) = match self.cli.input_file.as_deref() {
            None | Some("-") => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .map_err(|err| read_error("<stdin>", err))?;
                ("<stdin>".to_string(), content)
            }
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|err| read_error(path, err))?;
                (path.to_string(), content)
            }
        };

        self.file = Some(SourceFile::new(path, content));
        self.compile()
    }

    fn compile(&self) -> Result<Output, CompilerError> {
        let Some(file) = &self.file else {
            return Err(CompilerError::new(vec![Report::new(
                "no input".to_string(),
                None,
            )]));
        };
        Ok(self.compile_source(file)?)
    }

    fn compile_source(&self, file: &SourceFile) -> Result<Output, Error> {
        let mut preprocessor = Preprocessor::new();
        for def in &self.cli.define {
            preprocessor.define(def)?;
        }

        debug!("lexing {}", file.name.display());
        let tokens = Lexer::new(&file.content).tokenize()?;
        debug!("preprocessing {} tokens", tokens.len());
        let tokens = preprocessor.preprocess(tokens)?;

        if self.cli.preprocess_only {
            let text = format_tokens(&tokens);
            match &self.cli.output_file {
                Some(output_file) => fs::write(output_file, &text)?,
                None => print!("{}", text),
            }
            return Ok(Output::Preprocessed(text));
        }

        debug!("parsing {} tokens", tokens.len());
        let unit = Parser::new(tokens).parse()?;
        debug!(
            "parsed {} functions, {} top-level names",
            unit.functions.len(),
            unit.symbols.len()
        );

        if self.cli.dump_ast {
            eprint!("{}", Dumper::dump(&unit));
        }
        Ok(Output::Parsed(unit))
    }
}

fn read_error(path: &str, err: io::Error) -> CompilerError {
    CompilerError::new(vec![Report::new(format!("{}: {}", path, err), None)])
}

/// Serialises a token sequence back to source text.
pub fn format_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.as_str()).collect()
}
