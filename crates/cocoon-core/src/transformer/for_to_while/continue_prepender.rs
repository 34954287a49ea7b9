// Copies a desugared loop's updates in front of every `continue` that
// targeted it. Nested loops are not entered: a `continue` inside them
// belongs to them.

use crate::ast::{Block, Piece, Stmt};
use crate::transformer::UnsupportedConstruct;

/// Insert `updates` before each `continue` of the loop whose body is `body`.
///
/// A `continue` that is a statement of a block gets the updates spliced in
/// ahead of it; a `continue` in any other position (an unbraced `if` branch,
/// a label) is replaced by `{ updates; continue; }`.
pub fn prepend_updates(body: &mut Block, updates: &[Stmt]) -> Result<(), UnsupportedConstruct> {
    let mut index = 0;
    while index < body.stmts.len() {
        if matches!(body.stmts[index], Stmt::Continue { label: None }) {
            body.stmts.splice(index..index, updates.iter().cloned());
            index += updates.len() + 1;
            continue;
        }
        prepend_in_stmt(&mut body.stmts[index], updates)?;
        index += 1;
    }
    Ok(())
}

fn prepend_in_stmt(stmt: &mut Stmt, updates: &[Stmt]) -> Result<(), UnsupportedConstruct> {
    match stmt {
        Stmt::Continue { label: Some(label) } => Err(UnsupportedConstruct::LabeledContinue {
            label: label.clone(),
        }),
        Stmt::Continue { label: None } => {
            let mut stmts = updates.to_vec();
            stmts.push(Stmt::Continue { label: None });
            *stmt = Stmt::Block(Block::new(stmts));
            Ok(())
        }
        Stmt::Block(block) => prepend_updates(block, updates),
        Stmt::If {
            then_branch,
            else_branch,
            ..
        } => {
            prepend_in_stmt(then_branch, updates)?;
            if let Some(else_branch) = else_branch {
                prepend_in_stmt(else_branch, updates)?;
            }
            Ok(())
        }
        Stmt::Labeled { body, .. } => prepend_in_stmt(body, updates),
        // switch, try and synchronized bodies still belong to the loop
        Stmt::Verbatim(verbatim) => {
            for piece in &mut verbatim.pieces {
                if let Piece::Stmt(inner) = piece {
                    prepend_in_stmt(inner, updates)?;
                }
            }
            Ok(())
        }
        Stmt::For { .. } | Stmt::ForEach { .. } | Stmt::While { .. } | Stmt::DoWhile { .. } => {
            Ok(())
        }
        Stmt::Local(_)
        | Stmt::Expr(_)
        | Stmt::Break { .. }
        | Stmt::Return(_)
        | Stmt::Throw(_)
        | Stmt::Empty
        | Stmt::Comment(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{Expr, ToSource, UnaryOp};
    use crate::parser::parse;
    use crate::test_support::assert_same_code;

    fn updates() -> Vec<Stmt> {
        vec![Stmt::Expr(Expr::Unary {
            op: UnaryOp::PostInc,
            operand: Box::new(Expr::name("i")),
        })]
    }

    fn prepend(source: &str) -> Result<String, UnsupportedConstruct> {
        let mut callable = parse(source).unwrap();
        let body = callable.body.as_mut().unwrap();
        prepend_updates(body, &updates())?;
        Ok(callable.to_source())
    }

    #[test]
    fn test_bare_continue_becomes_block() {
        let code = prepend("void f() { if (a) continue; g(); }").unwrap();
        assert_same_code(&code, "void f() { if (a) { i++; continue; } g(); }");
    }

    #[test]
    fn test_block_continue_gets_updates_spliced_in() {
        let code = prepend("void f() { if (a) { g(); continue; } else { continue; } }").unwrap();
        assert_same_code(
            &code,
            "void f() { if (a) { g(); i++; continue; } else { i++; continue; } }",
        );
    }

    #[test]
    fn test_nested_loops_are_not_entered() {
        let source = "void f() { while (b) { continue; } for (;;) continue; do { continue; } while (b); for (int x : xs) { continue; } }";
        let code = prepend(source).unwrap();
        assert_same_code(&code, source);
    }

    #[test]
    fn test_reaches_switch_and_try_bodies() {
        let code = prepend(
            "void f() { switch (k) { case 1: continue; default: g(); } try { continue; } finally { h(); } }",
        )
        .unwrap();
        assert_same_code(
            &code,
            "void f() { switch (k) { case 1: { i++; continue; } default: g(); } try { i++; continue; } finally { h(); } }",
        );
    }

    #[test]
    fn test_labeled_continue_is_unsupported() {
        let err = prepend("void f() { if (a) { continue outer; } }").unwrap_err();
        assert_eq!(
            err,
            UnsupportedConstruct::LabeledContinue {
                label: "outer".to_string()
            }
        );
    }

    #[test]
    fn test_labeled_continue_inside_nested_loop_is_ignored() {
        let source = "void f() { inner: while (b) { continue inner; } }";
        assert_same_code(&prepend(source).unwrap(), source);
    }
}
