use tracing::debug;

use super::{Pass, PassError};
use crate::ast::visit_mut::{walk_expr_mut, VisitMut};
use crate::ast::{Callable, Expr};
use crate::snippet::{Snippet, Transformation};

/// `a == b` becomes `b == a`, and the same for `!=`
///
/// Operands that assign or update a variable are left in place, since
/// swapping them would change evaluation order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwapEqualsOperands;

impl SwapEqualsOperands {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for SwapEqualsOperands {
    fn name(&self) -> &'static str {
        "swapEqualsOperandsTransformer"
    }

    fn description(&self) -> &'static str {
        "Swaps the operands of equality comparisons"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let mut swapper = EqualsSwapper::default();
        swapper.visit_callable_mut(callable);
        snippet.add_transformations(Transformation::SwapEqualsOperands, swapper.count);
        Ok(())
    }
}

#[derive(Default)]
struct EqualsSwapper {
    count: usize,
}

impl VisitMut for EqualsSwapper {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Binary { left, op, right } = expr {
            if op.is_equality() && !left.contains_assignment() && !right.contains_assignment() {
                std::mem::swap(left, right);
                self.count += 1;
                debug!(rewrite = "swap-equals", op = %op, "swapped operands");
            }
        }
        walk_expr_mut(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{assert_same_code, run_pass};

    #[test]
    fn test_swaps_equality_operands() {
        let (code, snippet) = run_pass(
            &SwapEqualsOperands,
            "boolean f(int a, Object o) { return a == 1 && o != null; }",
        );
        assert_same_code(&code, "boolean f(int a, Object o) { return 1 == a && null != o; }");
        assert_eq!(snippet.count(Transformation::SwapEqualsOperands), 2);
    }

    #[test]
    fn test_nested_equalities_are_grouped() {
        let (code, _) = run_pass(
            &SwapEqualsOperands,
            "boolean f(boolean a, boolean b, boolean c) { return a == b == c; }",
        );
        assert_same_code(&code, "boolean f(boolean a, boolean b, boolean c) { return c == (b == a); }");
    }

    #[test]
    fn test_skips_operands_with_side_effects_on_variables() {
        let source = "void f(int a, int b) { if ((a = read()) == b) { } if (a++ != b) { } }";
        let (code, snippet) = run_pass(&SwapEqualsOperands, source);
        assert_same_code(&code, source);
        assert!(snippet.transformations.is_empty());
    }

    #[test]
    fn test_leaves_other_operators() {
        let source = "int f(int a, int b) { return a + b * a - (a < b ? 1 : 0); }";
        let (code, snippet) = run_pass(&SwapEqualsOperands, source);
        assert_same_code(&code, source);
        assert!(snippet.transformations.is_empty());
    }
}
