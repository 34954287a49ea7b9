use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::{IdentifierKind, OracleError, SynonymOracle};

/// A thesaurus file: every word maps to its senses, most common first,
/// each sense being a word or a space-separated phrase.
///
/// ```json
/// { "value": ["worth", "economic value", "time value"] }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Thesaurus {
    entries: HashMap<String, Vec<String>>,
}

impl Thesaurus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry<I, S>(mut self, word: &str, senses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(word.to_string(), senses.into_iter().map(Into::into).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn senses(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }
}

/// Dictionary-based oracle that ignores the surrounding code
#[derive(Debug, Clone, Default)]
pub struct LexicalOracle {
    thesaurus: Thesaurus,
}

impl LexicalOracle {
    pub fn new(thesaurus: Thesaurus) -> Self {
        Self { thesaurus }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let text = fs::read_to_string(path.as_ref())?;
        let thesaurus: Thesaurus = serde_json::from_str(&text)
            .map_err(|e| OracleError::Malformed(format!("thesaurus: {e}")))?;
        debug!(path = %path.as_ref().display(), words = thesaurus.len(), "loaded thesaurus");
        Ok(Self::new(thesaurus))
    }
}

impl SynonymOracle for LexicalOracle {
    fn generate_synonym_for(
        &self,
        name: &str,
        _context: &str,
        _kind: IdentifierKind,
    ) -> Result<String, OracleError> {
        if name.chars().count() == 1 {
            return Ok(name.to_string());
        }
        let Some(senses) = self.thesaurus.senses(name) else {
            return Ok(name.to_string());
        };
        let synonym = senses
            .iter()
            .filter_map(|sense| sense.split(' ').next())
            .find(|word| *word != name)
            .unwrap_or(name);
        Ok(synonym.to_string())
    }
}
