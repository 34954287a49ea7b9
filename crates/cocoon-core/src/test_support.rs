//! Helpers shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use tree_sitter::{Node, Parser};

use crate::ast::ToSource;
use crate::parser::parse;
use crate::snippet::Snippet;
use crate::synonyms::{IdentifierKind, OracleError, SynonymOracle};
use crate::transformer::Pass;

/// Token texts of a member declaration, comments dropped
pub(crate) fn tokens(code: &str) -> Vec<String> {
    let wrapped = format!("class Wrapper {{\n{code}\n}}");
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_java::LANGUAGE.into())
        .expect("java grammar");
    let tree = parser.parse(&wrapped, None).expect("tree-sitter parse");
    assert!(
        !tree.root_node().has_error(),
        "not valid Java:\n{code}"
    );

    let mut out = Vec::new();
    collect_tokens(tree.root_node(), &wrapped, &mut out);
    out
}

fn collect_tokens(node: Node, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        "line_comment" | "block_comment" => {}
        _ if node.child_count() == 0 => out.push(source[node.byte_range()].to_string()),
        _ => {
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                collect_tokens(child, source, out);
            }
        }
    }
}

/// Compare two pieces of Java ignoring layout and comments
pub(crate) fn assert_same_code(actual: &str, expected: &str) {
    assert_eq!(
        tokens(actual).join(" "),
        tokens(expected).join(" "),
        "\nactual code:\n{actual}"
    );
}

pub(crate) fn snippet(code: &str) -> Snippet {
    Snippet::new("test", code)
}

/// Apply one pass to `source`; returns the printed result and the snippet
/// the pass recorded on.
pub(crate) fn run_pass(pass: &dyn Pass, source: &str) -> (String, Snippet) {
    let mut callable = parse(source).expect("test source parses");
    let mut target = snippet(source);
    pass.apply(&mut callable, &mut target)
        .unwrap_or_else(|e| panic!("{} failed: {e}", pass.name()));
    let code = callable.to_source();
    // printed output must itself be valid Java
    tokens(&code);
    (code, target)
}

/// Oracle answering from a fixed table; names not in the table come back
/// unchanged.
#[derive(Default)]
pub(crate) struct ScriptedOracle {
    table: HashMap<String, String>,
    failures: HashSet<String>,
    queries: Mutex<Vec<String>>,
    contexts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub(crate) fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            table: pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn failing_on(mut self, name: &str) -> Self {
        self.failures.insert(name.to_string());
        self
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

impl SynonymOracle for ScriptedOracle {
    fn generate_synonym_for(
        &self,
        name: &str,
        context: &str,
        _kind: IdentifierKind,
    ) -> Result<String, OracleError> {
        self.queries.lock().unwrap().push(name.to_string());
        self.contexts.lock().unwrap().push(context.to_string());
        if self.failures.contains(name) {
            return Err(OracleError::Unavailable(format!("scripted failure for {name}")));
        }
        Ok(self.table.get(name).cloned().unwrap_or_else(|| name.to_string()))
    }
}
