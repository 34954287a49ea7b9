// Syntax tree for a single Java method or constructor.
// Built by the tree-sitter front end, rewritten in place by the passes and
// turned back into Java source by `source_gen`.

pub mod source_gen;
pub mod visit;
pub mod visit_mut;
pub use source_gen::ToSource;

#[cfg(test)]
mod source_gen_tests;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a callable is an ordinary method or a constructor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallableKind {
    Method,
    Constructor,
}

/// A method or constructor declaration, the root every pass works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callable {
    /// Javadoc and other comments written before the declaration
    pub comments: Vec<String>,
    pub kind: CallableKind,
    /// Source text before the name: annotations, modifiers, type parameters
    /// and (for methods) the return type.
    pub header: String,
    pub name: String,
    pub params: Vec<Param>,
    /// Source text between the parameter list and the body, e.g. a `throws`
    /// clause.
    pub trailer: String,
    /// `None` for abstract and interface methods.
    pub body: Option<Block>,
}

/// A formal parameter: `final List<String> names`, `int... values`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Modifiers and type, including a trailing `...` for varargs
    pub ty: String,
    pub name: String,
    /// C-style array dimensions written after the name (`int values[]`)
    pub dims: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    /// The last statement that is not a comment
    pub fn last_code(&self) -> Option<&Stmt> {
        self.stmts.iter().rev().find(|stmt| !stmt.is_comment())
    }
}

/// `final int i = 0, j[] = {1}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDecl {
    /// Modifiers and declared type
    pub ty: String,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    pub name: String,
    pub dims: String,
    pub init: Option<Expr>,
}

/// Initializer section of a classic `for` header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ForInit {
    /// `for (int i = 0, j = 0; ...)`
    Decl(LocalDecl),
    /// `for (i = 0, j = n; ...)`, possibly empty
    Exprs(Vec<Expr>),
}

impl ForInit {
    pub fn is_empty(&self) -> bool {
        matches!(self, ForInit::Exprs(exprs) if exprs.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Block(Block),
    Local(LocalDecl),
    Expr(Expr),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    For {
        init: ForInit,
        condition: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },
    ForEach {
        ty: String,
        name: String,
        dims: String,
        iterable: Expr,
        body: Box<Stmt>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Continue {
        label: Option<String>,
    },
    Break {
        label: Option<String>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Empty,
    /// A line or block comment between the statements of a block
    Comment(String),
    /// try, switch, synchronized, assert, local classes, `super(...)` calls
    Verbatim(Verbatim),
}

impl Stmt {
    /// A statement that starts a new iteration scope for `continue`
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            Stmt::For { .. } | Stmt::ForEach { .. } | Stmt::While { .. } | Stmt::DoWhile { .. }
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Stmt::Comment(_))
    }

    pub fn into_block(self) -> Block {
        match self {
            Stmt::Block(block) => block,
            other => Block::new(vec![other]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A simple name in expression position: a variable, parameter or field
    /// read or write
    Name(String),
    Bool(bool),
    /// Numbers, strings, characters, `null`, `this`, `super`, class literals
    Literal(String),
    Paren(Box<Expr>),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
    Field {
        object: Box<Expr>,
        field: String,
    },
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    /// Lambdas, casts, ternaries, `new`, `instanceof`, method references
    Verbatim(Verbatim),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn paren(inner: Expr) -> Self {
        Expr::Paren(Box::new(inner))
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            Expr::Name(_)
            | Expr::Bool(_)
            | Expr::Literal(_)
            | Expr::Paren(_)
            | Expr::Field { .. }
            | Expr::Index { .. }
            | Expr::Call { .. } => Precedence::Primary,
            Expr::Binary { op, .. } => op.precedence(),
            Expr::Unary { op, .. } if op.is_postfix() => Precedence::Postfix,
            Expr::Unary { .. } => Precedence::Unary,
            Expr::Assign { .. } => Precedence::Assignment,
            Expr::Verbatim(verbatim) => verbatim.precedence,
        }
    }

    /// True if evaluating this expression writes to a variable: an
    /// assignment or an increment/decrement anywhere inside it.
    pub fn contains_assignment(&self) -> bool {
        use visit::Visit;

        struct Finder(bool);
        impl Visit for Finder {
            fn visit_expr(&mut self, expr: &Expr) {
                match expr {
                    Expr::Assign { .. } => self.0 = true,
                    Expr::Unary { op, .. } if op.is_update() => self.0 = true,
                    _ => visit::walk_expr(self, expr),
                }
            }
        }

        let mut finder = Finder(false);
        finder.visit_expr(self);
        finder.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "&" => BinaryOp::BitAnd,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            ">" => BinaryOp::Gt,
            "<=" => BinaryOp::Le,
            ">=" => BinaryOp::Ge,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOp::Or => Precedence::Or,
            BinaryOp::And => Precedence::And,
            BinaryOp::BitOr => Precedence::BitOr,
            BinaryOp::BitXor => Precedence::BitXor,
            BinaryOp::BitAnd => Precedence::BitAnd,
            BinaryOp::Eq | BinaryOp::Ne => Precedence::Equality,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge => Precedence::Relational,
            BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => Precedence::Shift,
            BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => Precedence::Multiplicative,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    pub fn is_relational(self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge)
    }

    /// The comparison that is true exactly when this one is false
    pub fn complement(self) -> Option<Self> {
        Some(match self {
            BinaryOp::Eq => BinaryOp::Ne,
            BinaryOp::Ne => BinaryOp::Eq,
            BinaryOp::Gt => BinaryOp::Le,
            BinaryOp::Ge => BinaryOp::Lt,
            BinaryOp::Lt => BinaryOp::Ge,
            BinaryOp::Le => BinaryOp::Gt,
            _ => return None,
        })
    }

    /// The comparison with the same truth value once operands are swapped
    pub fn mirror(self) -> Option<Self> {
        Some(match self {
            BinaryOp::Lt => BinaryOp::Gt,
            BinaryOp::Gt => BinaryOp::Lt,
            BinaryOp::Le => BinaryOp::Ge,
            BinaryOp::Ge => BinaryOp::Le,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub fn from_prefix_token(token: &str) -> Option<Self> {
        Some(match token {
            "!" => UnaryOp::Not,
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Plus,
            "~" => UnaryOp::BitNot,
            "++" => UnaryOp::PreInc,
            "--" => UnaryOp::PreDec,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc | UnaryOp::PostInc => "++",
            UnaryOp::PreDec | UnaryOp::PostDec => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostInc | UnaryOp::PostDec)
    }

    pub fn is_update(self) -> bool {
        matches!(
            self,
            UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl AssignOp {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::Add,
            "-=" => AssignOp::Sub,
            "*=" => AssignOp::Mul,
            "/=" => AssignOp::Div,
            "%=" => AssignOp::Rem,
            "&=" => AssignOp::BitAnd,
            "|=" => AssignOp::BitOr,
            "^=" => AssignOp::BitXor,
            "<<=" => AssignOp::Shl,
            ">>=" => AssignOp::Shr,
            ">>>=" => AssignOp::UShr,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
        }
    }
}

/// Java operator precedence, loosest binding first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Precedence {
    /// Assignments and lambdas
    Assignment,
    Ternary,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    /// Comparisons and `instanceof`
    Relational,
    Shift,
    Additive,
    Multiplicative,
    /// Prefix operators and casts
    Unary,
    Postfix,
    Primary,
}

/// A construct kept as its original text, with the statements, expressions
/// and declared names inside it still exposed to the passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verbatim {
    pub precedence: Precedence,
    pub pieces: Vec<Piece>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Piece {
    Text(String),
    Binding(Binding),
    Expr(Expr),
    Stmt(Stmt),
}

/// A name declared inside a verbatim construct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub kind: BindingKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    /// Local variables, for-each variables, resources, pattern variables
    Variable,
    /// Method, lambda and catch parameters
    Parameter,
}
