use std::sync::Arc;

use tracing::debug;

use super::{collect_renames, RenameTarget, Renamer, SynonymGuard};
use crate::ast::visit_mut::VisitMut;
use crate::ast::Callable;
use crate::snippet::{Snippet, Transformation};
use crate::synonyms::{IdentifierKind, SynonymOracle};
use crate::transformer::{Pass, PassError};

/// Renames the formal parameters of the callable
pub struct ParameterName {
    oracle: Arc<dyn SynonymOracle>,
}

impl ParameterName {
    pub fn new(oracle: Arc<dyn SynonymOracle>) -> Self {
        Self { oracle }
    }
}

impl Pass for ParameterName {
    fn name(&self) -> &'static str {
        "parameterNameTransformer"
    }

    fn description(&self) -> &'static str {
        "Renames method and constructor parameters to synonyms suggested by the oracle"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let guard = SynonymGuard::new(callable);
        let names = guard.names();
        // `Foo this` is a receiver declaration, not an argument
        let eligible = callable
            .params
            .iter()
            .map(|param| param.name.as_str())
            .filter(|name| *name != "this" && !names.is_variable(name));
        let mapping = collect_renames(
            self.oracle.as_ref(),
            &guard,
            eligible,
            &snippet.code,
            IdentifierKind::Parameter,
        );

        if !mapping.is_empty() {
            Renamer::new(&mapping, RenameTarget::Parameters).visit_callable_mut(callable);
            debug!(renamed = mapping.len(), "renamed parameters");
        }
        snippet.add_transformations(Transformation::RenameParameters, mapping.len());
        snippet.parameter_mapping = Some(mapping);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::snippet::NameMapping;
    use crate::test_support::{assert_same_code, run_pass, ScriptedOracle};

    fn pass(oracle: ScriptedOracle) -> ParameterName {
        ParameterName::new(Arc::new(oracle))
    }

    #[test]
    fn test_renames_parameters_everywhere() {
        let oracle = ScriptedOracle::new(&[("values", "items"), ("limit", "bound")]);
        let (code, snippet) = run_pass(
            &pass(oracle),
            "public int count(final int[] values, int limit) { int c = 0; for (int v : values) { if (v < limit) c++; } return c; }",
        );
        assert_same_code(
            &code,
            "public int count(final int[] items, int bound) { int c = 0; for (int v : items) { if (v < bound) c++; } return c; }",
        );
        assert_eq!(snippet.count(Transformation::RenameParameters), 2);
        let mapping = snippet.parameter_mapping.unwrap();
        assert_eq!(mapping.get("values").map(String::as_str), Some("items"));
        assert_eq!(mapping.get("limit").map(String::as_str), Some("bound"));
    }

    #[test]
    fn test_constructor_parameters_and_this_fields() {
        let oracle = ScriptedOracle::new(&[("name", "label")]);
        let (code, _) = run_pass(
            &pass(oracle),
            "public Person(String name) { this.name = name; }",
        );
        assert_same_code(&code, "public Person(String label) { this.name = label; }");
    }

    #[test]
    fn test_candidate_matching_a_local_is_rejected() {
        let oracle = ScriptedOracle::new(&[("n", "count")]);
        let source = "int f(int n) { int count = n * 2; return count; }";
        let (code, snippet) = run_pass(&pass(oracle), source);
        assert_same_code(&code, source);
        assert_eq!(snippet.parameter_mapping, Some(NameMapping::new()));
    }

    #[test]
    fn test_locals_are_not_parameters() {
        let oracle = ScriptedOracle::new(&[("x", "value")]);
        let source = "void f() { int x = 1; g(x); }";
        let (code, snippet) = run_pass(&pass(oracle), source);
        assert_same_code(&code, source);
        assert!(snippet.transformations.is_empty());
    }

    #[test]
    fn test_receiver_parameter_is_not_renamed() {
        let oracle = ScriptedOracle::new(&[("this", "self"), ("n", "count")]);
        let (code, snippet) = run_pass(&pass(oracle), "void f(Foo this, int n) { g(n); }");
        assert_same_code(&code, "void f(Foo this, int count) { g(count); }");
        let mapping = snippet.parameter_mapping.unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("this"), None);
    }

    #[test]
    fn test_varargs_and_array_dims_survive() {
        let oracle = ScriptedOracle::new(&[("args", "arguments"), ("grid", "matrix")]);
        let (code, _) = run_pass(
            &pass(oracle),
            "void f(int grid[], String... args) { g(grid, args); }",
        );
        assert_same_code(
            &code,
            "void f(int matrix[], String... arguments) { g(matrix, arguments); }",
        );
    }
}
