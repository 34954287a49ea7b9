use tracing::debug;

use super::{Pass, PassError};
use crate::ast::visit_mut::{walk_stmt_mut, VisitMut};
use crate::ast::{Block, Callable, Stmt};
use crate::snippet::{Snippet, Transformation};

/// `else if (c) ...` becomes `else { if (c) ... }`
#[derive(Debug, Default, Clone, Copy)]
pub struct NestElseIf;

impl NestElseIf {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for NestElseIf {
    fn name(&self) -> &'static str {
        "nestElseIfTransformer"
    }

    fn description(&self) -> &'static str {
        "Wraps every else-if in an explicit else block"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let mut nester = Nester::default();
        nester.visit_callable_mut(callable);
        snippet.add_transformations(Transformation::NestElseIf, nester.count);
        Ok(())
    }
}

#[derive(Default)]
struct Nester {
    count: usize,
}

impl VisitMut for Nester {
    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        if let Stmt::If {
            else_branch: Some(else_branch),
            ..
        } = stmt
        {
            if matches!(**else_branch, Stmt::If { .. }) {
                let nested = std::mem::replace(&mut **else_branch, Stmt::Empty);
                **else_branch = Stmt::Block(Block::new(vec![nested]));
                self.count += 1;
                debug!(rewrite = "nest-else-if", "nested else-if");
            }
        }
        walk_stmt_mut(self, stmt);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::{assert_same_code, run_pass};

    #[test]
    fn test_nests_every_link_of_a_chain() {
        let (code, snippet) = run_pass(
            &NestElseIf,
            "int f(int x) { if (x < 0) return -1; else if (x == 0) return 0; else if (x < 10) return 1; else return 2; }",
        );
        assert_same_code(
            &code,
            "int f(int x) { if (x < 0) return -1; else { if (x == 0) return 0; else { if (x < 10) return 1; else return 2; } } }",
        );
        assert_eq!(snippet.count(Transformation::NestElseIf), 2);
    }

    #[test]
    fn test_plain_else_is_untouched() {
        let source = "void f(boolean a) { if (a) { g(); } else { h(); } }";
        let (code, snippet) = run_pass(&NestElseIf, source);
        assert_same_code(&code, source);
        assert!(snippet.transformations.is_empty());
    }
}
