/*!
# Synonym Oracles

An oracle proposes a new name for an identifier given the source it appears
in. The identifier passes treat every answer as a suggestion: whatever comes
back still has to pass their acceptance guard.

- [`LexicalOracle`]: offline, backed by a JSON thesaurus
- [`PromptOracle`]: asks a [`LanguageModel`], optionally through a
  [`CachedModel`]
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::CacheError;

pub mod lexical;
pub mod llm;

pub use lexical::LexicalOracle;
pub use llm::{CachedModel, LanguageModel, OpenAiModel, PromptOracle};

/// What kind of declaration a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Variable,
    Parameter,
    Function,
}

impl IdentifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierKind::Variable => "variable",
            IdentifierKind::Parameter => "parameter",
            IdentifierKind::Function => "function",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An oracle could not produce a synonym
#[derive(thiserror::Error, Debug)]
pub enum OracleError {
    #[error("Synonym oracle unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Response cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Proposes replacement names for identifiers
pub trait SynonymOracle: Send + Sync {
    /// Suggest a new name for `name`, a `kind` declared in `context`.
    ///
    /// Returning `name` itself means "no good alternative".
    fn generate_synonym_for(
        &self,
        name: &str,
        context: &str,
        kind: IdentifierKind,
    ) -> Result<String, OracleError>;
}
