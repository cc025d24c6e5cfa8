use cinder::compiler::{Cli, Compiler};
use clap::Parser as ClapParser;
use log::LevelFilter;
use std::process::exit;

/// The main entry point for the application.
///
/// Parses command-line arguments and runs the compiler.
fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let mut compiler = Compiler::new(cli);
    if let Err(e) = compiler.run() {
        compiler.print_diagnostic(&e.reports);
        exit(1);
    }
}

/// `RUST_LOG` selects the log level; `-v` raises it to debug.
fn init_logger(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
