use tree_sitter::Node;

use super::ParseError;
use crate::ast::{
    BinaryOp, Binding, BindingKind, Block, Callable, CallableKind, Declarator, Expr, ForInit,
    LocalDecl, Param, Piece, Precedence, Stmt, UnaryOp, AssignOp, Verbatim,
};

// A lone member declaration is not a compilation unit, so it is parsed inside
// a throwaway class. The wrapper adds one line before the snippet.
const WRAPPER_OPEN: &str = "class Wrapper {\n";
const WRAPPER_CLOSE: &str = "\n}";

const LITERAL_KINDS: &[&str] = &[
    "decimal_integer_literal",
    "hex_integer_literal",
    "octal_integer_literal",
    "binary_integer_literal",
    "decimal_floating_point_literal",
    "hex_floating_point_literal",
    "character_literal",
    "string_literal",
    "text_block",
    "null_literal",
    "class_literal",
    "this",
    "super",
];

const EXPRESSION_KINDS: &[&str] = &[
    "identifier",
    "true",
    "false",
    "assignment_expression",
    "binary_expression",
    "instanceof_expression",
    "lambda_expression",
    "ternary_expression",
    "update_expression",
    "unary_expression",
    "cast_expression",
    "switch_expression",
    "parenthesized_expression",
    "object_creation_expression",
    "field_access",
    "array_access",
    "method_invocation",
    "method_reference",
    "array_creation_expression",
    "array_initializer",
    "template_expression",
];

const STATEMENT_KINDS: &[&str] = &[
    "block",
    "expression_statement",
    "labeled_statement",
    "if_statement",
    "while_statement",
    "for_statement",
    "enhanced_for_statement",
    "assert_statement",
    "do_statement",
    "break_statement",
    "continue_statement",
    "return_statement",
    "yield_statement",
    "synchronized_statement",
    "local_variable_declaration",
    "throw_statement",
    "try_statement",
    "try_with_resources_statement",
];

/// Java parser backed by tree-sitter-java
pub struct JavaParser {
    parser: tree_sitter::Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
        parser
            .set_language(&language)
            .map_err(|e| ParseError::Language(e.to_string()))?;

        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Callable, ParseError> {
        let wrapped = format!("{WRAPPER_OPEN}{source}{WRAPPER_CLOSE}");
        let tree = self
            .parser
            .parse(&wrapped, None)
            .ok_or_else(|| ParseError::Internal("parser returned no tree".to_string()))?;

        let root = tree.root_node();
        if let Some(error) = first_error(root) {
            let point = error.start_position();
            return Err(ParseError::Syntax {
                line: point.row.max(1),
                column: point.column + 1,
            });
        }

        let converter = Converter { source: &wrapped };
        let class = code_children(root)
            .into_iter()
            .find(|node| node.kind() == "class_declaration")
            .ok_or(ParseError::NoCallable)?;
        let body = converter.field(class, "body")?;

        let members = code_children(body);
        let comments = leading_comments(body, &converter);
        let member = match members.as_slice() {
            [] => return Err(ParseError::NoCallable),
            [member] => *member,
            _ => {
                return Err(ParseError::MultipleMembers {
                    count: members.len(),
                })
            }
        };

        let kind = match member.kind() {
            "method_declaration" => CallableKind::Method,
            "constructor_declaration" => CallableKind::Constructor,
            _ => return Err(ParseError::NoCallable),
        };
        let mut callable = converter.convert_callable(member, kind)?;
        callable.comments = comments;
        Ok(callable)
    }
}

/// Comments in the wrapper class ahead of the member, e.g. its Javadoc
fn leading_comments(class_body: Node, converter: &Converter) -> Vec<String> {
    let mut cursor = class_body.walk();
    class_body
        .named_children(&mut cursor)
        .take_while(|child| is_comment(*child))
        .map(|comment| converter.text(comment).trim_end().to_string())
        .collect()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

/// Named children that carry code
fn code_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !is_comment(*child))
        .collect()
}

/// Declared-name role of an identifier found inside a verbatim construct
fn binding_kind(parent: Node, field: Option<&str>) -> Option<BindingKind> {
    match (parent.kind(), field) {
        ("formal_parameter" | "catch_formal_parameter", Some("name")) => Some(BindingKind::Parameter),
        ("variable_declarator", Some("name")) => {
            let in_spread = parent
                .parent()
                .is_some_and(|grand| grand.kind() == "spread_parameter");
            Some(if in_spread {
                BindingKind::Parameter
            } else {
                BindingKind::Variable
            })
        }
        ("resource" | "instanceof_expression", Some("name")) => Some(BindingKind::Variable),
        ("type_pattern", _) => Some(BindingKind::Variable),
        ("inferred_parameters", _) | ("lambda_expression", Some("parameters")) => {
            Some(BindingKind::Parameter)
        }
        _ => None,
    }
}

/// Whether the switch owning `rule` is evaluated for its value
fn yields_value(rule: Node) -> bool {
    let switch = rule.parent().and_then(|block| block.parent());
    let context = switch.and_then(|switch| switch.parent());
    !matches!(
        context.map(|node| node.kind()),
        Some(
            "block"
                | "switch_block_statement_group"
                | "labeled_statement"
                | "expression_statement"
                | "if_statement"
                | "while_statement"
                | "do_statement"
        )
    )
}

struct Converter<'s> {
    source: &'s str,
}

impl<'s> Converter<'s> {
    fn text(&self, node: Node) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn slice(&self, start: usize, end: usize) -> &'s str {
        self.source.get(start..end).unwrap_or_default()
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ParseError> {
        node.child_by_field_name(name)
            .ok_or_else(|| ParseError::Internal(format!("{} without {name}", node.kind())))
    }

    fn first_code_child<'t>(&self, node: Node<'t>) -> Result<Node<'t>, ParseError> {
        code_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::Internal(format!("empty {}", node.kind())))
    }

    fn convert_callable(&self, node: Node, kind: CallableKind) -> Result<Callable, ParseError> {
        let name = self.field(node, "name")?;
        let parameters = self.field(node, "parameters")?;
        let body = node.child_by_field_name("body");

        let header = self.slice(node.start_byte(), name.start_byte()).trim();
        let trailer_end = match body {
            Some(body) => body.start_byte(),
            None => node.end_byte(),
        };
        let trailer = self
            .slice(parameters.end_byte(), trailer_end)
            .trim()
            .trim_end_matches(';')
            .trim_end();

        let params = code_children(parameters)
            .into_iter()
            .map(|param| self.convert_param(param))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Callable {
            comments: Vec::new(),
            kind,
            header: header.to_string(),
            name: self.text(name).to_string(),
            params,
            trailer: trailer.to_string(),
            body: body.map(|body| self.convert_block(body)).transpose()?,
        })
    }

    fn convert_param(&self, node: Node) -> Result<Param, ParseError> {
        let (name, dims) = match node.kind() {
            "spread_parameter" => {
                let declarator = code_children(node)
                    .into_iter()
                    .find(|child| child.kind() == "variable_declarator")
                    .ok_or_else(|| ParseError::Internal("spread_parameter without name".into()))?;
                (
                    self.field(declarator, "name")?,
                    declarator.child_by_field_name("dimensions"),
                )
            }
            "receiver_parameter" => {
                let text = self.text(node);
                let ty = text.trim_end().trim_end_matches("this").trim_end();
                return Ok(Param {
                    ty: ty.to_string(),
                    name: "this".to_string(),
                    dims: String::new(),
                });
            }
            _ => (
                self.field(node, "name")?,
                node.child_by_field_name("dimensions"),
            ),
        };

        let ty = self.slice(node.start_byte(), name.start_byte()).trim();
        Ok(Param {
            ty: ty.to_string(),
            name: self.text(name).to_string(),
            dims: dims.map(|d| self.text(d).to_string()).unwrap_or_default(),
        })
    }

    fn convert_block(&self, node: Node) -> Result<Block, ParseError> {
        let mut stmts = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "{" | "}" => {}
                ";" => stmts.push(Stmt::Empty),
                _ if is_comment(child) => {
                    stmts.push(Stmt::Comment(self.text(child).trim_end().to_string()))
                }
                _ if child.is_named() => stmts.push(self.convert_stmt(child)?),
                _ => {}
            }
        }
        Ok(Block::new(stmts))
    }

    fn convert_stmt(&self, node: Node) -> Result<Stmt, ParseError> {
        match node.kind() {
            "block" => Ok(Stmt::Block(self.convert_block(node)?)),
            ";" => Ok(Stmt::Empty),
            "local_variable_declaration" => Ok(Stmt::Local(self.convert_local_decl(node)?)),
            "expression_statement" => {
                let expr = self.first_code_child(node)?;
                Ok(Stmt::Expr(self.convert_expr(expr)?))
            }
            "if_statement" => Ok(Stmt::If {
                condition: self.convert_condition(self.field(node, "condition")?)?,
                then_branch: Box::new(self.convert_stmt(self.field(node, "consequence")?)?),
                else_branch: node
                    .child_by_field_name("alternative")
                    .map(|alt| self.convert_stmt(alt).map(Box::new))
                    .transpose()?,
            }),
            "for_statement" => self.convert_for(node),
            "enhanced_for_statement" => {
                let ty = self.field(node, "type")?;
                let name = self.field(node, "name")?;
                let start = code_children(node)
                    .first()
                    .map(|first| first.start_byte())
                    .unwrap_or_else(|| ty.start_byte());
                Ok(Stmt::ForEach {
                    ty: self.slice(start, ty.end_byte()).to_string(),
                    name: self.text(name).to_string(),
                    dims: node
                        .child_by_field_name("dimensions")
                        .map(|d| self.text(d).to_string())
                        .unwrap_or_default(),
                    iterable: self.convert_expr(self.field(node, "value")?)?,
                    body: Box::new(self.convert_stmt(self.field(node, "body")?)?),
                })
            }
            "while_statement" => Ok(Stmt::While {
                condition: self.convert_condition(self.field(node, "condition")?)?,
                body: Box::new(self.convert_stmt(self.field(node, "body")?)?),
            }),
            "do_statement" => Ok(Stmt::DoWhile {
                body: Box::new(self.convert_stmt(self.field(node, "body")?)?),
                condition: self.convert_condition(self.field(node, "condition")?)?,
            }),
            "labeled_statement" => {
                let children = code_children(node);
                match children.as_slice() {
                    [label, .., body] => Ok(Stmt::Labeled {
                        label: self.text(*label).to_string(),
                        body: Box::new(self.convert_stmt(*body)?),
                    }),
                    _ => Err(ParseError::Internal("labeled_statement without body".into())),
                }
            }
            "continue_statement" => Ok(Stmt::Continue {
                label: self.jump_label(node),
            }),
            "break_statement" => Ok(Stmt::Break {
                label: self.jump_label(node),
            }),
            "return_statement" => Ok(Stmt::Return(
                code_children(node)
                    .into_iter()
                    .next()
                    .map(|value| self.convert_expr(value))
                    .transpose()?,
            )),
            "throw_statement" => Ok(Stmt::Throw(
                self.convert_expr(self.first_code_child(node)?)?,
            )),
            _ => Ok(Stmt::Verbatim(self.verbatim(node, Precedence::Primary)?)),
        }
    }

    fn jump_label(&self, node: Node) -> Option<String> {
        code_children(node)
            .into_iter()
            .find(|child| child.kind() == "identifier")
            .map(|label| self.text(label).to_string())
    }

    fn convert_for(&self, node: Node) -> Result<Stmt, ParseError> {
        let mut cursor = node.walk();
        let inits: Vec<Node> = node.children_by_field_name("init", &mut cursor).collect();
        let init = match inits.as_slice() {
            [decl] if decl.kind() == "local_variable_declaration" => {
                ForInit::Decl(self.convert_local_decl(*decl)?)
            }
            exprs => ForInit::Exprs(
                exprs
                    .iter()
                    .map(|expr| self.convert_expr(*expr))
                    .collect::<Result<_, _>>()?,
            ),
        };

        let mut cursor = node.walk();
        let update = node
            .children_by_field_name("update", &mut cursor)
            .map(|expr| self.convert_expr(expr))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Stmt::For {
            init,
            condition: node
                .child_by_field_name("condition")
                .map(|cond| self.convert_expr(cond))
                .transpose()?,
            update,
            body: Box::new(self.convert_stmt(self.field(node, "body")?)?),
        })
    }

    fn convert_local_decl(&self, node: Node) -> Result<LocalDecl, ParseError> {
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        let first = declarators
            .first()
            .ok_or_else(|| ParseError::Internal("declaration without declarator".into()))?;
        let ty = self.slice(node.start_byte(), first.start_byte()).trim();

        let declarators = declarators
            .iter()
            .map(|declarator| {
                Ok(Declarator {
                    name: self.text(self.field(*declarator, "name")?).to_string(),
                    dims: declarator
                        .child_by_field_name("dimensions")
                        .map(|d| self.text(d).to_string())
                        .unwrap_or_default(),
                    init: declarator
                        .child_by_field_name("value")
                        .map(|value| self.convert_expr(value))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(LocalDecl {
            ty: ty.to_string(),
            declarators,
        })
    }

    /// `if`, `while` and `do` keep their parentheses in the grammar; the
    /// printer adds them back.
    fn convert_condition(&self, node: Node) -> Result<Expr, ParseError> {
        if node.kind() == "parenthesized_expression" {
            self.convert_expr(self.first_code_child(node)?)
        } else {
            self.convert_expr(node)
        }
    }

    fn convert_expr(&self, node: Node) -> Result<Expr, ParseError> {
        let kind = node.kind();
        match kind {
            "identifier" => Ok(Expr::Name(self.text(node).to_string())),
            "true" => Ok(Expr::Bool(true)),
            "false" => Ok(Expr::Bool(false)),
            _ if LITERAL_KINDS.contains(&kind) => Ok(Expr::Literal(self.text(node).to_string())),
            "parenthesized_expression" => Ok(Expr::paren(
                self.convert_expr(self.first_code_child(node)?)?,
            )),
            "binary_expression" => {
                let operator = self.text(self.field(node, "operator")?);
                match BinaryOp::from_token(operator) {
                    Some(op) => Ok(Expr::binary(
                        self.convert_expr(self.field(node, "left")?)?,
                        op,
                        self.convert_expr(self.field(node, "right")?)?,
                    )),
                    None => self.verbatim_expr(node),
                }
            }
            "unary_expression" => {
                let operator = self.text(self.field(node, "operator")?);
                match UnaryOp::from_prefix_token(operator) {
                    Some(op) => Ok(Expr::Unary {
                        op,
                        operand: Box::new(self.convert_expr(self.field(node, "operand")?)?),
                    }),
                    None => self.verbatim_expr(node),
                }
            }
            "update_expression" => self.convert_update(node),
            "assignment_expression" => {
                let operator = self.text(self.field(node, "operator")?);
                match AssignOp::from_token(operator) {
                    Some(op) => Ok(Expr::Assign {
                        target: Box::new(self.convert_expr(self.field(node, "left")?)?),
                        op,
                        value: Box::new(self.convert_expr(self.field(node, "right")?)?),
                    }),
                    None => self.verbatim_expr(node),
                }
            }
            "field_access" => {
                let object = self.field(node, "object")?;
                if self.has_super_qualifier(node, object) {
                    return self.verbatim_expr(node);
                }
                Ok(Expr::Field {
                    object: Box::new(self.convert_expr(object)?),
                    field: self.text(self.field(node, "field")?).to_string(),
                })
            }
            "array_access" => Ok(Expr::Index {
                array: Box::new(self.convert_expr(self.field(node, "array")?)?),
                index: Box::new(self.convert_expr(self.field(node, "index")?)?),
            }),
            "method_invocation" => self.convert_call(node),
            _ => self.verbatim_expr(node),
        }
    }

    fn convert_update(&self, node: Node) -> Result<Expr, ParseError> {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        let (operand, op) = match children.as_slice() {
            [operator, operand] if !operator.is_named() => {
                let op = match operator.kind() {
                    "++" => UnaryOp::PreInc,
                    _ => UnaryOp::PreDec,
                };
                (*operand, op)
            }
            [operand, operator] => {
                let op = match operator.kind() {
                    "++" => UnaryOp::PostInc,
                    _ => UnaryOp::PostDec,
                };
                (*operand, op)
            }
            _ => return self.verbatim_expr(node),
        };
        Ok(Expr::Unary {
            op,
            operand: Box::new(self.convert_expr(operand)?),
        })
    }

    /// `Outer.super.name` forms
    fn has_super_qualifier(&self, node: Node, object: Node) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| child.kind() == "super" && child.id() != object.id());
        found
    }

    fn convert_call(&self, node: Node) -> Result<Expr, ParseError> {
        let object = node.child_by_field_name("object");
        let qualified_super = object.is_some_and(|object| self.has_super_qualifier(node, object));
        if node.child_by_field_name("type_arguments").is_some() || qualified_super {
            return self.verbatim_expr(node);
        }

        let args = code_children(self.field(node, "arguments")?)
            .into_iter()
            .map(|arg| self.convert_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Expr::Call {
            receiver: object
                .map(|object| self.convert_expr(object).map(Box::new))
                .transpose()?,
            name: self.text(self.field(node, "name")?).to_string(),
            args,
        })
    }

    fn verbatim_expr(&self, node: Node) -> Result<Expr, ParseError> {
        let precedence = match node.kind() {
            "lambda_expression" | "assignment_expression" => Precedence::Assignment,
            "ternary_expression" => Precedence::Ternary,
            "instanceof_expression" => Precedence::Relational,
            "cast_expression" | "unary_expression" => Precedence::Unary,
            "binary_expression" => Precedence::Or,
            _ => Precedence::Primary,
        };
        Ok(Expr::Verbatim(self.verbatim(node, precedence)?))
    }

    fn verbatim(&self, node: Node, precedence: Precedence) -> Result<Verbatim, ParseError> {
        let mut pieces = Vec::new();
        self.flatten(node, &mut pieces)?;
        Ok(Verbatim { precedence, pieces })
    }

    /// Appends the pieces of `node`, keeping the source text between its
    /// children exactly as written.
    fn flatten(&self, node: Node, pieces: &mut Vec<Piece>) -> Result<(), ParseError> {
        let mut pos = node.start_byte();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            let mut index = 0;
            loop {
                let child = cursor.node();
                let field = cursor.field_name();
                self.push_text(pieces, pos, child.start_byte());
                self.flatten_child(node, child, field, index, pieces)?;
                pos = child.end_byte();
                index += 1;
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        self.push_text(pieces, pos, node.end_byte());
        Ok(())
    }

    fn flatten_child(
        &self,
        parent: Node,
        child: Node,
        field: Option<&str>,
        index: usize,
        pieces: &mut Vec<Piece>,
    ) -> Result<(), ParseError> {
        let kind = child.kind();

        if kind == "identifier" {
            if let Some(kind) = binding_kind(parent, field) {
                pieces.push(Piece::Binding(Binding {
                    kind,
                    name: self.text(child).to_string(),
                }));
            } else if matches!(field, Some("name" | "key"))
                || (parent.kind() == "method_reference" && index > 0)
            {
                self.push_text(pieces, child.start_byte(), child.end_byte());
            } else {
                pieces.push(Piece::Expr(Expr::Name(self.text(child).to_string())));
            }
            return Ok(());
        }

        // `case 1 -> x++;` in a switch used as a value is the value, not a
        // statement: rewriting it as one would change what the switch yields.
        let switch_value = kind == "expression_statement"
            && parent.kind() == "switch_rule"
            && yields_value(parent);
        if switch_value {
            return self.flatten(child, pieces);
        }

        let statement_switch =
            kind == "switch_expression" && parent.kind() == "switch_block_statement_group";
        if STATEMENT_KINDS.contains(&kind) || statement_switch {
            pieces.push(Piece::Stmt(self.convert_stmt(child)?));
        } else if parent.kind() == "method_reference" && index > 0 {
            self.flatten_or_text(child, pieces)?;
        } else if EXPRESSION_KINDS.contains(&kind) || LITERAL_KINDS.contains(&kind) {
            pieces.push(Piece::Expr(self.convert_expr(child)?));
        } else {
            self.flatten_or_text(child, pieces)?;
        }
        Ok(())
    }

    fn flatten_or_text(&self, node: Node, pieces: &mut Vec<Piece>) -> Result<(), ParseError> {
        if node.child_count() == 0 || is_comment(node) {
            self.push_text(pieces, node.start_byte(), node.end_byte());
            Ok(())
        } else {
            self.flatten(node, pieces)
        }
    }

    fn push_text(&self, pieces: &mut Vec<Piece>, start: usize, end: usize) {
        let text = self.slice(start, end);
        if text.is_empty() {
            return;
        }
        if let Some(Piece::Text(last)) = pieces.last_mut() {
            last.push_str(text);
        } else {
            pieces.push(Piece::Text(text.to_string()));
        }
    }
}
