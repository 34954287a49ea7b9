use tracing::debug;

use super::{Pass, PassError};
use crate::ast::visit_mut::{walk_stmt_mut, VisitMut};
use crate::ast::{BinaryOp, Callable, Expr, Stmt, UnaryOp};
use crate::snippet::{Snippet, Transformation};

/// `if (c) A else B` becomes `if (!c) B else A` when `B` is a block
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseIf;

impl ReverseIf {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for ReverseIf {
    fn name(&self) -> &'static str {
        "reverseIfTransformer"
    }

    fn description(&self) -> &'static str {
        "Swaps the branches of if-else statements and negates the condition"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let mut reverser = Reverser::default();
        reverser.visit_callable_mut(callable);
        snippet.add_transformations(Transformation::ReverseIf, reverser.count);
        Ok(())
    }
}

#[derive(Default)]
struct Reverser {
    count: usize,
}

impl VisitMut for Reverser {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        if let Stmt::If {
            condition,
            then_branch,
            else_branch: Some(else_branch),
        } = stmt
        {
            if matches!(**else_branch, Stmt::Block(_)) {
                std::mem::swap(then_branch, else_branch);
                let original = std::mem::replace(condition, Expr::Bool(true));
                *condition = negate(original);
                self.count += 1;
                debug!(rewrite = "reverse-if", "reversed if-else");
            }
        }
        walk_stmt_mut(self, stmt);
    }
}

/// Logical negation that pushes `!` inward where Java allows it.
///
/// Comparisons flip their operator, `&&` and `||` swap with De Morgan's laws
/// and `!x` unwraps. Everything else gets a `!`, parenthesized unless the
/// operand already binds tightly.
pub fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Bool(value) => Expr::Bool(!value),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => *operand,
        Expr::Binary { left, op, right } => match op {
            BinaryOp::And | BinaryOp::Or => {
                let flipped = if op == BinaryOp::And {
                    BinaryOp::Or
                } else {
                    BinaryOp::And
                };
                // Negating `||` yields `&&`, so negated `&&` operands turn into
                // `||` and need grouping.
                let group = |operand: Box<Expr>| {
                    let was_and = matches!(*operand, Expr::Binary { op: BinaryOp::And, .. });
                    let negated = negate(*operand);
                    if op == BinaryOp::Or && was_and {
                        Expr::paren(negated)
                    } else {
                        negated
                    }
                };
                let left = group(left);
                let right = group(right);
                Expr::binary(left, flipped, right)
            }
            _ => match op.complement() {
                Some(complement) => Expr::Binary {
                    left,
                    op: complement,
                    right,
                },
                None => Expr::not(Expr::paren(Expr::Binary { left, op, right })),
            },
        },
        expr @ (Expr::Name(_) | Expr::Call { .. } | Expr::Paren(_)) => Expr::not(expr),
        other => Expr::not(Expr::paren(other)),
    }
}
