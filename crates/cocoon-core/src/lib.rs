//! # Cocoon Core
//!
//! Semantics-preserving rewrite engine for single Java methods and
//! constructors:
//! - Syntax tree model and Java source generation
//! - Tree-sitter based Java front end
//! - Structural rewrite passes and the loop desugaring subsystem
//! - Identifier renaming driven by a pluggable synonym oracle
//! - Pipeline composition and the snippet transform driver
//!
//! The `cocoon` binary in the `cocoon-cli` crate drives this engine over
//! JSON snippet collections using a YAML configuration.

#![warn(clippy::all)]

pub mod ast;
pub mod config;
pub mod parser;
pub mod snippet;
pub mod storage;
pub mod synonyms;
pub mod transformer;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use ast::{Callable, ToSource};
pub use config::{CocoonConfig, ConfigError};
pub use parser::{parse, ParseError};
pub use snippet::{Snippet, Transformation};
pub use synonyms::{IdentifierKind, OracleError, SynonymOracle};
pub use transformer::{
    transform, Pass, PassError, Pipeline, TransformationSummary, UnsupportedConstruct,
};

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the rewrite engine
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cocoon_core=info,cocoon_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Error types for a driver run over one snippet
#[derive(thiserror::Error, Debug)]
pub enum CocoonError {
    /// The snippet is not a single Java method or constructor
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A pass could not complete
    #[error("Pass error: {0}")]
    Pass(#[from] PassError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, CocoonError>;
