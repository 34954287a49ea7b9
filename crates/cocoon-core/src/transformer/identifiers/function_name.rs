use std::sync::Arc;

use tracing::debug;

use super::{collect_renames, SynonymGuard};
use crate::ast::visit_mut::{walk_expr_mut, VisitMut};
use crate::ast::{Callable, CallableKind, Expr};
use crate::snippet::{Snippet, Transformation};
use crate::synonyms::{IdentifierKind, SynonymOracle};
use crate::transformer::{Pass, PassError};

/// Methods every class inherits from `java.lang.Object`; renaming an
/// override would silently stop it overriding.
pub const OBJECT_METHODS: &[&str] = &[
    "getClass", "hashCode", "equals", "clone", "toString", "notify", "notifyAll", "wait",
    "finalize",
];

/// Renames the method itself and its recursive calls
pub struct FunctionName {
    oracle: Arc<dyn SynonymOracle>,
}

impl FunctionName {
    pub fn new(oracle: Arc<dyn SynonymOracle>) -> Self {
        Self { oracle }
    }
}

impl Pass for FunctionName {
    fn name(&self) -> &'static str {
        "functionNameTransformer"
    }

    fn description(&self) -> &'static str {
        "Renames the method to a synonym suggested by the oracle, along with its recursive calls"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        if callable.kind == CallableKind::Constructor {
            return Ok(());
        }
        if OBJECT_METHODS.contains(&callable.name.as_str()) {
            debug!(name = %callable.name, "keeping java.lang.Object method name");
            return Ok(());
        }

        let original = callable.name.clone();
        let guard = SynonymGuard::for_method(callable);
        let mapping = collect_renames(
            self.oracle.as_ref(),
            &guard,
            [original.as_str()],
            &snippet.code,
            IdentifierKind::Function,
        );
        let Some(new_name) = mapping.get(&original).cloned() else {
            return Ok(());
        };

        callable.name = new_name.clone();
        let mut calls = CallRenamer {
            from: &original,
            to: &new_name,
            count: 0,
        };
        calls.visit_callable_mut(callable);
        debug!(from = %original, to = %new_name, calls = calls.count, "renamed function");

        snippet.add_transformation(Transformation::RenameFunction);
        snippet.function_mapping = Some(mapping);
        Ok(())
    }
}

/// Renames calls that resolve to the callable itself
struct CallRenamer<'a> {
    from: &'a str,
    to: &'a str,
    count: usize,
}

impl VisitMut for CallRenamer<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Call { receiver, name, .. } = expr {
            let own_call = match receiver.as_deref() {
                None => true,
                Some(Expr::Literal(this)) => this == "this",
                Some(_) => false,
            };
            if own_call && name.as_str() == self.from {
                *name = self.to.to_string();
                self.count += 1;
            }
        }
        walk_expr_mut(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{assert_same_code, run_pass, ScriptedOracle};

    fn pass(oracle: ScriptedOracle) -> FunctionName {
        FunctionName::new(Arc::new(oracle))
    }

    #[test]
    fn test_renames_declaration_and_recursive_calls() {
        let oracle = ScriptedOracle::new(&[("factorial", "product")]);
        let (code, snippet) = run_pass(
            &pass(oracle),
            "long factorial(int n) { if (n <= 1) { return 1; } return n * this.factorial(n - 1) + factorial(0) - other.factorial(n); }",
        );
        assert_same_code(
            &code,
            "long product(int n) { if (n <= 1) { return 1; } return n * this.product(n - 1) + product(0) - other.factorial(n); }",
        );
        assert_eq!(snippet.count(Transformation::RenameFunction), 1);
        let mapping = snippet.function_mapping.unwrap();
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("factorial").map(String::as_str), Some("product"));
    }

    #[test]
    fn test_object_methods_and_constructors_are_kept() {
        let oracle = ScriptedOracle::new(&[("toString", "describe"), ("Point", "Location")]);
        let pass = pass(oracle);

        for source in [
            "public String toString() { return name; }",
            "public Point(int x) { this.x = x; }",
        ] {
            let (code, snippet) = run_pass(&pass, source);
            assert_same_code(&code, source);
            assert_eq!(snippet.function_mapping, None);
        }
    }

    #[test]
    fn test_candidate_equal_to_a_called_method_is_rejected() {
        let oracle = ScriptedOracle::new(&[("load", "read")]);
        let source = "void load(Reader r) { r.read(); }";
        let (code, snippet) = run_pass(&pass(oracle), source);
        assert_same_code(&code, source);
        assert!(snippet.transformations.is_empty());
        assert_eq!(snippet.function_mapping, None);
    }

    #[test]
    fn test_name_of_a_local_or_field_is_accepted() {
        let oracle = ScriptedOracle::new(&[("total", "sum")]);
        let (code, snippet) = run_pass(
            &pass(oracle),
            "int total(int[] v) { int sum = 0; for (int x : v) { sum += x; } return sum; }",
        );
        assert_same_code(
            &code,
            "int sum(int[] v) { int sum = 0; for (int x : v) { sum += x; } return sum; }",
        );
        assert_eq!(snippet.count(Transformation::RenameFunction), 1);
    }

    #[test]
    fn test_unchanged_answer_is_not_a_rename() {
        let source = "int size() { return count; }";
        let (code, snippet) = run_pass(&pass(ScriptedOracle::new(&[])), source);
        assert_same_code(&code, source);
        assert!(snippet.transformations.is_empty());
    }

    #[test]
    fn test_oracle_failure_keeps_the_name() {
        let oracle = ScriptedOracle::new(&[("run", "execute")]).failing_on("run");
        let source = "void run() { step(); }";
        let (code, snippet) = run_pass(&pass(oracle), source);
        assert_same_code(&code, source);
        assert_eq!(snippet.function_mapping, None);
    }

    #[test]
    fn test_abstract_method_is_renamed() {
        let oracle = ScriptedOracle::new(&[("area", "surface")]);
        let (code, _) = run_pass(&pass(oracle), "abstract double area();");
        assert_same_code(&code, "abstract double surface();");
    }
}
