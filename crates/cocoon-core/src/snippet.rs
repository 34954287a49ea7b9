use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Kinds of rewrite a pass can record on a snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transformation {
    ForToWhile,
    ExpandUnaryIncrement,
    NestElseIf,
    ReverseIf,
    SwapEqualsOperands,
    SwapRelationOperands,
    RenameVariables,
    RenameParameters,
    RenameFunction,
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Original-name to new-name map, in the order renames were accepted
pub type NameMapping = IndexMap<String, String>;

/// One function or constructor and what has been done to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub code: String,
    #[serde(default)]
    pub transformations: BTreeMap<Transformation, usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_mapping: Option<NameMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_mapping: Option<NameMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_mapping: Option<NameMapping>,
}

impl Snippet {
    pub fn new(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            ..Self::default()
        }
    }

    /// Record `count` more occurrences of `kind`. Zero leaves the map alone.
    pub fn add_transformations(&mut self, kind: Transformation, count: usize) {
        if count == 0 {
            return;
        }
        *self.transformations.entry(kind).or_insert(0) += count;
    }

    pub fn add_transformation(&mut self, kind: Transformation) {
        self.add_transformations(kind, 1);
    }

    pub fn count(&self, kind: Transformation) -> usize {
        self.transformations.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_transformations(&self) -> usize {
        self.transformations.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_counts_accumulate_and_skip_zero() {
        let mut snippet = Snippet::new("1", "void f() {}");
        snippet.add_transformations(Transformation::ReverseIf, 0);
        assert!(snippet.transformations.is_empty());

        snippet.add_transformation(Transformation::ReverseIf);
        snippet.add_transformations(Transformation::ReverseIf, 2);
        assert_eq!(snippet.count(Transformation::ReverseIf), 3);
        assert_eq!(snippet.count(Transformation::ForToWhile), 0);
        assert_eq!(snippet.total_transformations(), 3);
    }

    #[test]
    fn test_json_uses_camel_case_and_omits_missing_mappings() {
        let mut snippet = Snippet::new("42", "void f() {}");
        snippet.add_transformation(Transformation::NestElseIf);
        let mut mapping = NameMapping::new();
        mapping.insert("count".to_string(), "tally".to_string());
        snippet.variable_mapping = Some(mapping);

        let json = serde_json::to_value(&snippet).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "42",
                "code": "void f() {}",
                "transformations": { "NestElseIf": 1 },
                "variableMapping": { "count": "tally" }
            })
        );

        let back: Snippet = serde_json::from_value(json).unwrap();
        assert_eq!(back, snippet);
    }
}
