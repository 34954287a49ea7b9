/*!
# For-to-While Desugaring

A classic `for` loop that is a direct child of a block is replaced by its
initializers followed by a `while` loop:

```text
for (int i = 0; i < n; i++) {        int i = 0;
    if (skip(i)) continue;     =>    while (i < n) {
    use(i);                              if (skip(i)) { i++; continue; }
}                                        use(i);
                                         i++;
                                     }
```

The initializers move out into the enclosing block, so a loop is skipped when
one of its declared names is declared anywhere else in that block. Every
`continue` that belonged to the loop receives its own copy of the updates
(see [`continue_prepender`]).
*/

use tracing::debug;

use super::scope::ScopeNames;
use super::{Pass, PassError, UnsupportedConstruct};
use crate::ast::visit::{walk_stmt, Visit};
use crate::ast::visit_mut::{walk_block_mut, VisitMut};
use crate::ast::{Block, Callable, Expr, ForInit, Stmt};
use crate::snippet::{Snippet, Transformation};

pub mod continue_prepender;

use continue_prepender::prepend_updates;

#[derive(Debug, Default, Clone, Copy)]
pub struct ForToWhile;

impl ForToWhile {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for ForToWhile {
    fn name(&self) -> &'static str {
        "forToWhileTransformer"
    }

    fn description(&self) -> &'static str {
        "Rewrites classic for loops as initializers followed by a while loop"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let mut desugarer = LoopDesugarer::default();
        desugarer.visit_callable_mut(callable);
        if let Some(error) = desugarer.error {
            return Err(error.into());
        }
        snippet.add_transformations(Transformation::ForToWhile, desugarer.count);
        Ok(())
    }
}

#[derive(Default)]
struct LoopDesugarer {
    count: usize,
    error: Option<UnsupportedConstruct>,
}

impl LoopDesugarer {
    fn rewrite_block(&mut self, block: &mut Block) -> Result<(), UnsupportedConstruct> {
        let names = ScopeNames::of_block(block);
        let candidates: Vec<usize> = block
            .stmts
            .iter()
            .enumerate()
            .filter(|(_, stmt)| match stmt {
                Stmt::For { init, .. } => !shadows(init, &names),
                _ => false,
            })
            .map(|(index, _)| index)
            .collect();

        // back to front so earlier indices stay valid while splicing
        for index in candidates.into_iter().rev() {
            let replacement = match block.stmts.remove(index) {
                Stmt::For {
                    init,
                    condition,
                    update,
                    body,
                } => desugar(init, condition, update, *body)?,
                other => vec![other],
            };
            block.stmts.splice(index..index, replacement);
            self.count += 1;
            debug!(rewrite = "for-to-while", "desugared for loop");
        }
        Ok(())
    }
}

impl VisitMut for LoopDesugarer {
    fn visit_block_mut(&mut self, block: &mut Block) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = self.rewrite_block(block) {
            self.error = Some(error);
            return;
        }
        walk_block_mut(self, block);
    }
}

/// A loop variable that is also declared elsewhere in the block would clash
/// once it is lifted out of the loop header.
fn shadows(init: &ForInit, names: &ScopeNames) -> bool {
    match init {
        ForInit::Decl(decl) => decl
            .declarators
            .iter()
            .any(|declarator| names.declarations(&declarator.name) > 1),
        ForInit::Exprs(_) => false,
    }
}

fn desugar(
    init: ForInit,
    condition: Option<Expr>,
    update: Vec<Expr>,
    body: Stmt,
) -> Result<Vec<Stmt>, UnsupportedConstruct> {
    let mut stmts = match init {
        ForInit::Decl(decl) => vec![Stmt::Local(decl)],
        ForInit::Exprs(exprs) => exprs.into_iter().map(Stmt::Expr).collect(),
    };

    let updates: Vec<Stmt> = update.into_iter().map(Stmt::Expr).collect();
    let mut body = body.into_block();
    prepend_updates(&mut body, &updates)?;
    if body.last_code().map_or(true, can_complete_normally) {
        body.stmts.extend(updates);
    }

    stmts.push(Stmt::While {
        condition: condition.unwrap_or(Expr::Bool(true)),
        body: Box::new(Stmt::Block(body)),
    });
    Ok(stmts)
}

/// Whether control can fall off the end of `stmt`. Appending the updates
/// after a statement that cannot is an unreachable-statement error in Java.
fn can_complete_normally(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Continue { .. } | Stmt::Break { .. } | Stmt::Return(_) | Stmt::Throw(_) => false,
        Stmt::Block(block) => block.last_code().map_or(true, can_complete_normally),
        Stmt::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => can_complete_normally(then_branch) || can_complete_normally(else_branch),
        Stmt::Labeled { label, body } => {
            can_complete_normally(body) || breaks_out(body, Some(label.as_str()))
        }
        Stmt::While { condition, body } | Stmt::DoWhile { body, condition } => {
            !matches!(condition, Expr::Bool(true)) || breaks_out(body, None)
        }
        Stmt::For {
            condition: None | Some(Expr::Bool(true)),
            body,
            ..
        } => breaks_out(body, None),
        _ => true,
    }
}

/// Finds a `break` that leaves the statement: an unlabeled one outside any
/// nested loop, or one naming `label`.
fn breaks_out(stmt: &Stmt, label: Option<&str>) -> bool {
    struct BreakFinder<'a> {
        label: Option<&'a str>,
        loops: usize,
        found: bool,
    }

    impl Visit for BreakFinder<'_> {
        fn visit_stmt(&mut self, stmt: &Stmt) {
            if self.found {
                return;
            }
            match stmt {
                Stmt::Break { label } => {
                    self.found = match (label.as_deref(), self.label) {
                        (None, None) => self.loops == 0,
                        (Some(target), Some(wanted)) => target == wanted,
                        _ => false,
                    };
                }
                _ if stmt.is_loop() => {
                    self.loops += 1;
                    walk_stmt(self, stmt);
                    self.loops -= 1;
                }
                _ => walk_stmt(self, stmt),
            }
        }
    }

    let mut finder = BreakFinder {
        label,
        loops: 0,
        found: false,
    };
    finder.visit_stmt(stmt);
    finder.found
}
