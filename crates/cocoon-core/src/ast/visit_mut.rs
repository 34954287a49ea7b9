//! In-place traversal over a callable's syntax tree.
//!
//! Same shape as [`super::visit`], but every hook receives `&mut` so a pass
//! can rewrite a node and then keep walking into whatever now sits there.

use super::*;

pub trait VisitMut {
    fn visit_callable_mut(&mut self, callable: &mut Callable) {
        walk_callable_mut(self, callable);
    }

    fn visit_param_mut(&mut self, _param: &mut Param) {}

    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_local_decl_mut(&mut self, decl: &mut LocalDecl) {
        walk_local_decl_mut(self, decl);
    }

    fn visit_declarator_mut(&mut self, declarator: &mut Declarator) {
        walk_declarator_mut(self, declarator);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_verbatim_mut(&mut self, verbatim: &mut Verbatim) {
        walk_verbatim_mut(self, verbatim);
    }

    fn visit_binding_mut(&mut self, _binding: &mut Binding) {}
}

pub fn walk_callable_mut<V: VisitMut + ?Sized>(visitor: &mut V, callable: &mut Callable) {
    for param in &mut callable.params {
        visitor.visit_param_mut(param);
    }
    if let Some(body) = &mut callable.body {
        visitor.visit_block_mut(body);
    }
}

pub fn walk_block_mut<V: VisitMut + ?Sized>(visitor: &mut V, block: &mut Block) {
    for stmt in &mut block.stmts {
        visitor.visit_stmt_mut(stmt);
    }
}

pub fn walk_local_decl_mut<V: VisitMut + ?Sized>(visitor: &mut V, decl: &mut LocalDecl) {
    for declarator in &mut decl.declarators {
        visitor.visit_declarator_mut(declarator);
    }
}

pub fn walk_declarator_mut<V: VisitMut + ?Sized>(visitor: &mut V, declarator: &mut Declarator) {
    if let Some(init) = &mut declarator.init {
        visitor.visit_expr_mut(init);
    }
}

pub fn walk_stmt_mut<V: VisitMut + ?Sized>(visitor: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Block(block) => visitor.visit_block_mut(block),
        Stmt::Local(decl) => visitor.visit_local_decl_mut(decl),
        Stmt::Expr(expr) | Stmt::Throw(expr) => visitor.visit_expr_mut(expr),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr_mut(condition);
            visitor.visit_stmt_mut(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt_mut(else_branch);
            }
        }
        Stmt::For {
            init,
            condition,
            update,
            body,
        } => {
            match init {
                ForInit::Decl(decl) => visitor.visit_local_decl_mut(decl),
                ForInit::Exprs(exprs) => {
                    for expr in exprs {
                        visitor.visit_expr_mut(expr);
                    }
                }
            }
            if let Some(condition) = condition {
                visitor.visit_expr_mut(condition);
            }
            for expr in update {
                visitor.visit_expr_mut(expr);
            }
            visitor.visit_stmt_mut(body);
        }
        Stmt::ForEach { iterable, body, .. } => {
            visitor.visit_expr_mut(iterable);
            visitor.visit_stmt_mut(body);
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr_mut(condition);
            visitor.visit_stmt_mut(body);
        }
        Stmt::DoWhile { body, condition } => {
            visitor.visit_stmt_mut(body);
            visitor.visit_expr_mut(condition);
        }
        Stmt::Labeled { body, .. } => visitor.visit_stmt_mut(body),
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr_mut(value);
            }
        }
        Stmt::Verbatim(verbatim) => visitor.visit_verbatim_mut(verbatim),
        Stmt::Continue { .. } | Stmt::Break { .. } | Stmt::Empty | Stmt::Comment(_) => {}
    }
}

pub fn walk_expr_mut<V: VisitMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    match expr {
        Expr::Name(_) | Expr::Bool(_) | Expr::Literal(_) => {}
        Expr::Paren(inner) => visitor.visit_expr_mut(inner),
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr_mut(left);
            visitor.visit_expr_mut(right);
        }
        Expr::Unary { operand, .. } => visitor.visit_expr_mut(operand),
        Expr::Assign { target, value, .. } => {
            visitor.visit_expr_mut(target);
            visitor.visit_expr_mut(value);
        }
        Expr::Field { object, .. } => visitor.visit_expr_mut(object),
        Expr::Index { array, index } => {
            visitor.visit_expr_mut(array);
            visitor.visit_expr_mut(index);
        }
        Expr::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                visitor.visit_expr_mut(receiver);
            }
            for arg in args {
                visitor.visit_expr_mut(arg);
            }
        }
        Expr::Verbatim(verbatim) => visitor.visit_verbatim_mut(verbatim),
    }
}

pub fn walk_verbatim_mut<V: VisitMut + ?Sized>(visitor: &mut V, verbatim: &mut Verbatim) {
    for piece in &mut verbatim.pieces {
        match piece {
            Piece::Text(_) => {}
            Piece::Binding(binding) => visitor.visit_binding_mut(binding),
            Piece::Expr(expr) => visitor.visit_expr_mut(expr),
            Piece::Stmt(stmt) => visitor.visit_stmt_mut(stmt),
        }
    }
}
