// Java front end: turns the text of one method or constructor into a `Callable`.
use crate::ast::Callable;

mod java;


pub use java::JavaParser;

/// Parse failures. Any of these makes the whole snippet unusable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Tree-sitter reported an error or missing node
    #[error("Syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    /// The source holds no method or constructor declaration
    #[error("Expected a method or constructor declaration")]
    NoCallable,

    /// The source holds more than one member declaration
    #[error("Expected exactly one declaration, found {count}")]
    MultipleMembers { count: usize },

    /// The Java grammar could not be loaded
    #[error("Failed to load Java grammar: {0}")]
    Language(String),

    /// The syntax tree did not have the expected shape
    #[error("Unexpected syntax tree: {0}")]
    Internal(String),
}

/// Parse a single method or constructor declaration
pub fn parse(source: &str) -> Result<Callable, ParseError> {
    JavaParser::new()?.parse(source)
}
