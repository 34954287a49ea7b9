// Tests for source generation from hand-built trees

#[cfg(test)]
mod source_gen_tests {
    use pretty_assertions::assert_eq;

    use crate::ast::*;

    fn name(n: &str) -> Expr {
        Expr::name(n)
    }

    #[test]
    fn test_callable_layout() {
        let callable = Callable {
            comments: Vec::new(),
            kind: CallableKind::Method,
            header: "public int".to_string(),
            name: "inc".to_string(),
            params: vec![Param {
                ty: "int".to_string(),
                name: "x".to_string(),
                dims: String::new(),
            }],
            trailer: String::new(),
            body: Some(Block::new(vec![Stmt::Return(Some(Expr::binary(
                name("x"),
                BinaryOp::Add,
                Expr::Literal("1".to_string()),
            )))])),
        };

        assert_eq!(
            callable.to_source(),
            "public int inc(int x) {\n    return x + 1;\n}"
        );
    }

    #[test]
    fn test_binary_parenthesizes_by_precedence() {
        // (a || b) && c
        let expr = Expr::binary(
            Expr::binary(name("a"), BinaryOp::Or, name("b")),
            BinaryOp::And,
            name("c"),
        );
        assert_eq!(expr.to_source(), "(a || b) && c");

        // a - (b - c) keeps its grouping on the right
        let expr = Expr::binary(
            name("a"),
            BinaryOp::Sub,
            Expr::binary(name("b"), BinaryOp::Sub, name("c")),
        );
        assert_eq!(expr.to_source(), "a - (b - c)");

        // a * b + c needs none
        let expr = Expr::binary(
            Expr::binary(name("a"), BinaryOp::Mul, name("b")),
            BinaryOp::Add,
            name("c"),
        );
        assert_eq!(expr.to_source(), "a * b + c");
    }

    #[test]
    fn test_not_wraps_binary_operand() {
        let expr = Expr::not(Expr::binary(name("a"), BinaryOp::Lt, name("b")));
        assert_eq!(expr.to_source(), "!(a < b)");
    }

    #[test]
    fn test_nested_negation_keeps_tokens_apart() {
        let expr = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(name("x")),
            }),
        };
        assert_eq!(expr.to_source(), "- -x");
    }

    #[test]
    fn test_if_else_chain_layout() {
        let stmt = Stmt::If {
            condition: name("a"),
            then_branch: Box::new(Stmt::Block(Block::new(vec![Stmt::Return(None)]))),
            else_branch: Some(Box::new(Stmt::If {
                condition: name("b"),
                then_branch: Box::new(Stmt::Break { label: None }),
                else_branch: None,
            })),
        };
        assert_eq!(
            stmt.to_source(),
            "if (a) {\n    return;\n} else if (b)\n    break;"
        );
    }

    #[test]
    fn test_dangling_else_gets_braces() {
        let stmt = Stmt::If {
            condition: name("a"),
            then_branch: Box::new(Stmt::If {
                condition: name("b"),
                then_branch: Box::new(Stmt::Return(None)),
                else_branch: None,
            }),
            else_branch: Some(Box::new(Stmt::Break { label: None })),
        };
        assert_eq!(
            stmt.to_source(),
            "if (a) {\n    if (b)\n        return;\n} else\n    break;"
        );
    }

    #[test]
    fn test_for_header_with_missing_parts() {
        let stmt = Stmt::For {
            init: ForInit::Exprs(vec![]),
            condition: None,
            update: vec![],
            body: Box::new(Stmt::Block(Block::default())),
        };
        assert_eq!(stmt.to_source(), "for (;;) {\n}");
    }

    #[test]
    fn test_verbatim_pieces_print_in_order() {
        let expr = Expr::Verbatim(Verbatim {
            precedence: Precedence::Assignment,
            pieces: vec![
                Piece::Binding(Binding {
                    kind: BindingKind::Parameter,
                    name: "x".to_string(),
                }),
                Piece::Text(" -> ".to_string()),
                Piece::Expr(Expr::binary(name("x"), BinaryOp::Mul, name("x"))),
            ],
        });
        assert_eq!(expr.to_source(), "x -> x * x");
    }
}
