// Source code generation from the syntax tree.
// Output is normalized Java: four-space indentation, one statement per line,
// and parentheses only where the tree's nesting needs them.

use super::*;

/// Trait for types that can generate their source code representation
pub trait ToSource {
    fn to_source(&self) -> String;
}

const INDENT: &str = "    ";

#[derive(Default)]
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn finish(self) -> String {
        self.out
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
    }

    fn write_callable(&mut self, callable: &Callable) {
        for comment in &callable.comments {
            self.push(comment);
            self.newline();
        }
        if !callable.header.is_empty() {
            self.push(&callable.header);
            self.push(" ");
        }
        self.push(&callable.name);
        self.push("(");
        for (i, param) in callable.params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&param.ty);
            self.push(" ");
            self.push(&param.name);
            self.push(&param.dims);
        }
        self.push(")");
        if !callable.trailer.is_empty() {
            self.push(" ");
            self.push(&callable.trailer);
        }
        match &callable.body {
            Some(body) => {
                self.push(" ");
                self.write_block(body);
            }
            None => self.push(";"),
        }
    }

    fn write_block(&mut self, block: &Block) {
        self.push("{");
        self.depth += 1;
        for stmt in &block.stmts {
            self.newline();
            self.write_stmt(stmt);
        }
        self.depth -= 1;
        self.newline();
        self.push("}");
    }

    /// Writes the body of an `if`, loop or `else`: blocks stay on the header
    /// line, anything else goes on its own indented line.
    fn write_branch(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => {
                self.push(" ");
                self.write_block(block);
            }
            other => {
                self.depth += 1;
                self.newline();
                self.write_stmt(other);
                self.depth -= 1;
            }
        }
    }

    fn write_local_decl(&mut self, decl: &LocalDecl) {
        self.push(&decl.ty);
        self.push(" ");
        for (i, declarator) in decl.declarators.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(&declarator.name);
            self.push(&declarator.dims);
            if let Some(init) = &declarator.init {
                self.push(" = ");
                self.write_expr(init);
            }
        }
    }

    fn write_exprs(&mut self, exprs: &[Expr]) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.write_expr(expr);
        }
    }

    fn write_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.write_block(block),
            Stmt::Local(decl) => {
                self.write_local_decl(decl);
                self.push(";");
            }
            Stmt::Expr(expr) => {
                self.write_expr(expr);
                self.push(";");
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.write_if(condition, then_branch, else_branch.as_deref()),
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                self.push("for (");
                match init {
                    ForInit::Decl(decl) => self.write_local_decl(decl),
                    ForInit::Exprs(exprs) => self.write_exprs(exprs),
                }
                self.push(";");
                if let Some(condition) = condition {
                    self.push(" ");
                    self.write_expr(condition);
                }
                self.push(";");
                if !update.is_empty() {
                    self.push(" ");
                    self.write_exprs(update);
                }
                self.push(")");
                self.write_branch(body);
            }
            Stmt::ForEach {
                ty,
                name,
                dims,
                iterable,
                body,
            } => {
                self.push(&format!("for ({ty} {name}{dims} : "));
                self.write_expr(iterable);
                self.push(")");
                self.write_branch(body);
            }
            Stmt::While { condition, body } => {
                self.push("while (");
                self.write_expr(condition);
                self.push(")");
                self.write_branch(body);
            }
            Stmt::DoWhile { body, condition } => {
                self.push("do");
                self.write_branch(body);
                if matches!(**body, Stmt::Block(_)) {
                    self.push(" ");
                } else {
                    self.newline();
                }
                self.push("while (");
                self.write_expr(condition);
                self.push(");");
            }
            Stmt::Labeled { label, body } => {
                self.push(label);
                self.push(": ");
                self.write_stmt(body);
            }
            Stmt::Continue { label } => self.write_jump("continue", label.as_deref()),
            Stmt::Break { label } => self.write_jump("break", label.as_deref()),
            Stmt::Return(value) => {
                self.push("return");
                if let Some(value) = value {
                    self.push(" ");
                    self.write_expr(value);
                }
                self.push(";");
            }
            Stmt::Throw(value) => {
                self.push("throw ");
                self.write_expr(value);
                self.push(";");
            }
            Stmt::Empty => self.push(";"),
            Stmt::Comment(text) => self.push(text),
            Stmt::Verbatim(verbatim) => self.write_verbatim(verbatim),
        }
    }

    fn write_jump(&mut self, keyword: &str, label: Option<&str>) {
        self.push(keyword);
        if let Some(label) = label {
            self.push(" ");
            self.push(label);
        }
        self.push(";");
    }

    fn write_if(&mut self, condition: &Expr, then_branch: &Stmt, else_branch: Option<&Stmt>) {
        self.push("if (");
        self.write_expr(condition);
        self.push(")");

        // An unbraced then-branch ending in an open `if` would capture our else.
        let brace_then = else_branch.is_some()
            && !matches!(then_branch, Stmt::Block(_))
            && ends_with_open_if(then_branch);
        if brace_then {
            self.push(" ");
            self.write_block(&Block::new(vec![then_branch.clone()]));
        } else {
            self.write_branch(then_branch);
        }

        let Some(else_branch) = else_branch else {
            return;
        };
        if brace_then || matches!(then_branch, Stmt::Block(_)) {
            self.push(" else");
        } else {
            self.newline();
            self.push("else");
        }
        match else_branch {
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.push(" ");
                self.write_if(condition, then_branch, else_branch.as_deref());
            }
            other => self.write_branch(other),
        }
    }

    fn write_verbatim(&mut self, verbatim: &Verbatim) {
        for piece in &verbatim.pieces {
            match piece {
                Piece::Text(text) => self.push(text),
                Piece::Binding(binding) => self.push(&binding.name),
                Piece::Expr(expr) => self.write_expr(expr),
                Piece::Stmt(stmt) => self.write_stmt(stmt),
            }
        }
    }

    fn write_operand(&mut self, expr: &Expr, wrap: bool) {
        if wrap {
            self.push("(");
            self.write_expr(expr);
            self.push(")");
        } else {
            self.write_expr(expr);
        }
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(name) => self.push(name),
            Expr::Bool(value) => self.push(if *value { "true" } else { "false" }),
            Expr::Literal(text) => self.push(text),
            Expr::Paren(inner) => self.write_operand(inner, true),
            Expr::Binary { left, op, right } => {
                let prec = op.precedence();
                self.write_operand(left, left.precedence() < prec);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.write_operand(right, right.precedence() <= prec);
            }
            Expr::Unary { op, operand } if op.is_postfix() => {
                self.write_operand(operand, operand.precedence() < Precedence::Postfix);
                self.push(op.as_str());
            }
            Expr::Unary { op, operand } => {
                let wrap = operand.precedence() < Precedence::Unary;
                let mut inner = SourceWriter {
                    out: String::new(),
                    depth: self.depth,
                };
                inner.write_operand(operand, wrap);
                let inner = inner.finish();
                self.push(op.as_str());
                // `- -x` and `+ ++x` must not fuse into a different token
                let fuses = match op {
                    UnaryOp::Neg | UnaryOp::PreDec => inner.starts_with('-'),
                    UnaryOp::Plus | UnaryOp::PreInc => inner.starts_with('+'),
                    _ => false,
                };
                if fuses {
                    self.push(" ");
                }
                self.push(&inner);
            }
            Expr::Assign { target, op, value } => {
                self.write_operand(target, target.precedence() < Precedence::Primary);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.write_expr(value);
            }
            Expr::Field { object, field } => {
                self.write_operand(object, object.precedence() < Precedence::Primary);
                self.push(".");
                self.push(field);
            }
            Expr::Index { array, index } => {
                self.write_operand(array, array.precedence() < Precedence::Primary);
                self.push("[");
                self.write_expr(index);
                self.push("]");
            }
            Expr::Call {
                receiver,
                name,
                args,
            } => {
                if let Some(receiver) = receiver {
                    self.write_operand(receiver, receiver.precedence() < Precedence::Primary);
                    self.push(".");
                }
                self.push(name);
                self.push("(");
                self.write_exprs(args);
                self.push(")");
            }
            Expr::Verbatim(verbatim) => self.write_verbatim(verbatim),
        }
    }
}

fn ends_with_open_if(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If {
            else_branch: None, ..
        } => true,
        Stmt::If {
            else_branch: Some(else_branch),
            ..
        } => ends_with_open_if(else_branch),
        Stmt::For { body, .. }
        | Stmt::ForEach { body, .. }
        | Stmt::While { body, .. }
        | Stmt::Labeled { body, .. } => ends_with_open_if(body),
        _ => false,
    }
}

impl ToSource for Callable {
    fn to_source(&self) -> String {
        let mut writer = SourceWriter::default();
        writer.write_callable(self);
        writer.finish()
    }
}

impl ToSource for Block {
    fn to_source(&self) -> String {
        let mut writer = SourceWriter::default();
        writer.write_block(self);
        writer.finish()
    }
}

impl ToSource for Stmt {
    fn to_source(&self) -> String {
        let mut writer = SourceWriter::default();
        writer.write_stmt(self);
        writer.finish()
    }
}

impl ToSource for Expr {
    fn to_source(&self) -> String {
        let mut writer = SourceWriter::default();
        writer.write_expr(self);
        writer.finish()
    }
}
