//! Read-only traversal over a callable's syntax tree.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which
//! recurses into the children in source order. Implementors override the
//! node kinds they care about and call `walk_*` to keep descending.

use super::*;

pub trait Visit {
    fn visit_callable(&mut self, callable: &Callable) {
        walk_callable(self, callable);
    }

    fn visit_param(&mut self, _param: &Param) {}

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_local_decl(&mut self, decl: &LocalDecl) {
        walk_local_decl(self, decl);
    }

    fn visit_declarator(&mut self, declarator: &Declarator) {
        walk_declarator(self, declarator);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_verbatim(&mut self, verbatim: &Verbatim) {
        walk_verbatim(self, verbatim);
    }

    fn visit_binding(&mut self, _binding: &Binding) {}
}

pub fn walk_callable<V: Visit + ?Sized>(visitor: &mut V, callable: &Callable) {
    for param in &callable.params {
        visitor.visit_param(param);
    }
    if let Some(body) = &callable.body {
        visitor.visit_block(body);
    }
}

pub fn walk_block<V: Visit + ?Sized>(visitor: &mut V, block: &Block) {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_local_decl<V: Visit + ?Sized>(visitor: &mut V, decl: &LocalDecl) {
    for declarator in &decl.declarators {
        visitor.visit_declarator(declarator);
    }
}

pub fn walk_declarator<V: Visit + ?Sized>(visitor: &mut V, declarator: &Declarator) {
    if let Some(init) = &declarator.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Block(block) => visitor.visit_block(block),
        Stmt::Local(decl) => visitor.visit_local_decl(decl),
        Stmt::Expr(expr) | Stmt::Throw(expr) => visitor.visit_expr(expr),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(else_branch);
            }
        }
        Stmt::For {
            init,
            condition,
            update,
            body,
        } => {
            match init {
                ForInit::Decl(decl) => visitor.visit_local_decl(decl),
                ForInit::Exprs(exprs) => {
                    for expr in exprs {
                        visitor.visit_expr(expr);
                    }
                }
            }
            if let Some(condition) = condition {
                visitor.visit_expr(condition);
            }
            for expr in update {
                visitor.visit_expr(expr);
            }
            visitor.visit_stmt(body);
        }
        Stmt::ForEach { iterable, body, .. } => {
            visitor.visit_expr(iterable);
            visitor.visit_stmt(body);
        }
        Stmt::While { condition, body } => {
            visitor.visit_expr(condition);
            visitor.visit_stmt(body);
        }
        Stmt::DoWhile { body, condition } => {
            visitor.visit_stmt(body);
            visitor.visit_expr(condition);
        }
        Stmt::Labeled { body, .. } => visitor.visit_stmt(body),
        Stmt::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(value);
            }
        }
        Stmt::Verbatim(verbatim) => visitor.visit_verbatim(verbatim),
        Stmt::Continue { .. } | Stmt::Break { .. } | Stmt::Empty | Stmt::Comment(_) => {}
    }
}

pub fn walk_expr<V: Visit + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Name(_) | Expr::Bool(_) | Expr::Literal(_) => {}
        Expr::Paren(inner) => visitor.visit_expr(inner),
        Expr::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        Expr::Unary { operand, .. } => visitor.visit_expr(operand),
        Expr::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        Expr::Field { object, .. } => visitor.visit_expr(object),
        Expr::Index { array, index } => {
            visitor.visit_expr(array);
            visitor.visit_expr(index);
        }
        Expr::Call { receiver, args, .. } => {
            if let Some(receiver) = receiver {
                visitor.visit_expr(receiver);
            }
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        Expr::Verbatim(verbatim) => visitor.visit_verbatim(verbatim),
    }
}

pub fn walk_verbatim<V: Visit + ?Sized>(visitor: &mut V, verbatim: &Verbatim) {
    for piece in &verbatim.pieces {
        match piece {
            Piece::Text(_) => {}
            Piece::Binding(binding) => visitor.visit_binding(binding),
            Piece::Expr(expr) => visitor.visit_expr(expr),
            Piece::Stmt(stmt) => visitor.visit_stmt(stmt),
        }
    }
}
