//! Front end of a small C compiler: macro preprocessor, recursive-descent
//! parser and structural type descriptors.
pub mod dumper;
pub mod source;

/// Contains common data structures and types.
pub mod common;
/// Contains the compiler driver.
pub mod compiler;
/// Contains the error types for the application.
pub mod error;
pub mod parser;
/// Contains the preprocessor.
pub mod preprocessor;

pub mod types;

pub mod test_utils;

pub use source::{SourceFile, SourceSpan};
