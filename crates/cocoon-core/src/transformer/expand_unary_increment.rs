use tracing::debug;

use super::{Pass, PassError};
use crate::ast::visit_mut::{walk_stmt_mut, VisitMut};
use crate::ast::{AssignOp, Callable, Expr, Stmt, UnaryOp};
use crate::snippet::{Snippet, Transformation};

/// `x++;` becomes `x += 1;` and `x--;` becomes `x -= 1;`
///
/// Only postfix updates whose value is discarded are rewritten: expression
/// statements and the update list of a `for` header.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpandUnaryIncrement;

impl ExpandUnaryIncrement {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for ExpandUnaryIncrement {
    fn name(&self) -> &'static str {
        "expandUnaryIncrementTransformer"
    }

    fn description(&self) -> &'static str {
        "Expands postfix increment and decrement statements into compound assignments"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let mut expander = Expander::default();
        expander.visit_callable_mut(callable);
        snippet.add_transformations(Transformation::ExpandUnaryIncrement, expander.count);
        Ok(())
    }
}

#[derive(Default)]
struct Expander {
    count: usize,
}

impl Expander {
    fn expand(&mut self, expr: &mut Expr) {
        let Expr::Unary { op, operand } = expr else {
            return;
        };
        let assign = match op {
            UnaryOp::PostInc => AssignOp::Add,
            UnaryOp::PostDec => AssignOp::Sub,
            _ => return,
        };
        let target = std::mem::replace(operand, Box::new(Expr::Bool(false)));
        *expr = Expr::Assign {
            target,
            op: assign,
            value: Box::new(Expr::Literal("1".to_string())),
        };
        self.count += 1;
        debug!(rewrite = "expand-unary", "expanded postfix update");
    }
}

impl VisitMut for Expander {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        match stmt {
            Stmt::Expr(expr) => self.expand(expr),
            Stmt::For { update, .. } => {
                for expr in update.iter_mut() {
                    self.expand(expr);
                }
            }
            _ => {}
        }
        walk_stmt_mut(self, stmt);
    }
}
