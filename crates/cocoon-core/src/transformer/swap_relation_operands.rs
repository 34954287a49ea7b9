use tracing::debug;

use super::{Pass, PassError};
use crate::ast::visit_mut::{walk_expr_mut, VisitMut};
use crate::ast::{Callable, Expr};
use crate::snippet::{Snippet, Transformation};

/// `a < b` becomes `b > a`; `<=` and `>=` mirror the same way
#[derive(Debug, Default, Clone, Copy)]
pub struct SwapRelationOperands;

impl SwapRelationOperands {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for SwapRelationOperands {
    fn name(&self) -> &'static str {
        "swapRelationOperandsTransformer"
    }

    fn description(&self) -> &'static str {
        "Swaps the operands of relational comparisons and mirrors the operator"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let mut swapper = RelationSwapper::default();
        swapper.visit_callable_mut(callable);
        snippet.add_transformations(Transformation::SwapRelationOperands, swapper.count);
        Ok(())
    }
}

#[derive(Default)]
struct RelationSwapper {
    count: usize,
}

impl VisitMut for RelationSwapper {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Binary { left, op, right } = expr {
            if let Some(mirrored) = op.mirror() {
                if !left.contains_assignment() && !right.contains_assignment() {
                    std::mem::swap(left, right);
                    *op = mirrored;
                    self.count += 1;
                    debug!(rewrite = "swap-relation", op = %mirrored, "swapped operands");
                }
            }
        }
        walk_expr_mut(self, expr);
    }
}
