/**
 * Parser Tests
 *
 * AST shapes and syntax errors for binding and action expressions
 */

#[cfg(test)]
mod tests {
    use trellis_compiler::expression_parser::{BinaryOp, Expr, Parser, Role, UnaryOp};
    use trellis_compiler::{CompileError, Value};

    fn parse_binding(text: &str) -> Expr {
        Parser::new()
            .parse_binding(text)
            .unwrap_or_else(|e| panic!("{} should parse: {}", text, e))
    }

    fn parse_action(text: &str) -> Expr {
        Parser::new()
            .parse_action(text)
            .unwrap_or_else(|e| panic!("{} should parse: {}", text, e))
    }

    fn binding_error(text: &str) -> String {
        match Parser::new().parse_binding(text) {
            Ok(ast) => panic!("{} should not parse, got {:?}", text, ast),
            Err(e) => e.to_string(),
        }
    }

    fn read(role: Role, name: &str) -> Expr {
        Expr::PropertyRead {
            receiver: Box::new(Expr::role(role)),
            name: name.to_string(),
        }
    }

    #[test]
    fn should_parse_literals() {
        assert_eq!(parse_binding("1"), Expr::literal(1.0));
        assert_eq!(parse_binding("'a'"), Expr::literal("a"));
        assert_eq!(parse_binding("true"), Expr::literal(true));
        assert_eq!(parse_binding("null"), Expr::Literal { value: Value::Null });
        assert_eq!(
            parse_binding("undefined"),
            Expr::Literal { value: Value::Null }
        );
    }

    #[test]
    fn should_respect_precedence() {
        let ast = parse_binding("1 + 2 * 3");
        let Expr::Binary { op, left, right } = ast else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(*left, Expr::literal(1.0));
        assert!(matches!(
            *right,
            Expr::Binary {
                op: BinaryOp::Multiply,
                ..
            }
        ));
    }

    #[test]
    fn should_be_left_associative() {
        let ast = parse_binding("10 - 2 - 3");
        let Expr::Binary { op, left, .. } = ast else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Subtract);
        assert!(matches!(
            *left,
            Expr::Binary {
                op: BinaryOp::Subtract,
                ..
            }
        ));
    }

    #[test]
    fn should_parse_role_reads() {
        assert_eq!(parse_binding("parent.a"), read(Role::Parent, "a"));
        assert_eq!(parse_binding("root.a"), read(Role::Root, "a"));
        assert_eq!(parse_binding("this.value"), read(Role::This, "value"));
    }

    #[test]
    fn should_parse_nested_member_and_keyed_access() {
        let ast = parse_binding("self.items[0].name");
        let Expr::PropertyRead { receiver, name } = ast else {
            panic!("expected property read");
        };
        assert_eq!(name, "name");
        assert!(matches!(*receiver, Expr::KeyedRead { .. }));
    }

    #[test]
    fn should_parse_method_calls() {
        let ast = parse_binding("self.name.toUpperCase()");
        let Expr::MethodCall {
            receiver,
            method,
            args,
        } = ast
        else {
            panic!("expected method call");
        };
        assert_eq!(method, "toUpperCase");
        assert!(args.is_empty());
        assert_eq!(*receiver, read(Role::Current, "name"));

        let ast = parse_binding("self.format(1, 'x')");
        let Expr::MethodCall { args, .. } = ast else {
            panic!("expected method call");
        };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn should_parse_prefix_operators() {
        let ast = parse_binding("!self.done");
        assert!(matches!(ast, Expr::Unary { op: UnaryOp::Not, .. }));
        let ast = parse_binding("-self.n");
        assert!(matches!(
            ast,
            Expr::Unary {
                op: UnaryOp::Minus,
                ..
            }
        ));
    }

    #[test]
    fn should_parse_conditional_and_nullish() {
        assert!(matches!(
            parse_binding("self.a ? 'y' : 'n'"),
            Expr::Conditional { .. }
        ));
        assert!(matches!(
            parse_binding("self.a ?? 0"),
            Expr::Binary {
                op: BinaryOp::Nullish,
                ..
            }
        ));
    }

    #[test]
    fn should_parse_in_operator() {
        assert!(matches!(
            parse_binding("'x' in self.items"),
            Expr::Binary { op: BinaryOp::In, .. }
        ));
    }

    #[test]
    fn should_parse_literal_collections() {
        let ast = parse_binding("[1, 'a', self.b]");
        let Expr::LiteralList { items } = ast else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);

        let ast = parse_binding("{a: 1, 'b c': self.x}");
        let Expr::LiteralMap { entries } = ast else {
            panic!("expected map");
        };
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[1].0, "b c");
    }

    #[test]
    fn should_parse_assignment_and_chains_in_actions() {
        let ast = parse_action("self.count = self.count + 1");
        assert!(matches!(ast, Expr::PropertyWrite { ref name, .. } if name == "count"));

        let ast = parse_action("self.a = 1; self.b = 2");
        let Expr::Chain { expressions } = ast else {
            panic!("expected chain");
        };
        assert_eq!(expressions.len(), 2);

        // A trailing separator is allowed
        assert!(matches!(parse_action("self.go();"), Expr::MethodCall { .. }));
    }

    #[test]
    fn should_reject_assignment_in_bindings() {
        assert!(binding_error("self.a = 1").contains("Bindings cannot contain assignments"));
    }

    #[test]
    fn should_reject_chains_in_bindings() {
        assert!(binding_error("self.a; self.b").contains("chained"));
    }

    #[test]
    fn should_reject_non_property_assignment_targets() {
        assert!(Parser::new().parse_action("self = 1").is_err());
        assert!(Parser::new().parse_action("1 = 1").is_err());
    }

    #[test]
    fn should_reject_free_identifiers() {
        let message = binding_error("window.alert(1)");
        assert!(message.contains("Unknown identifier 'window'"));
    }

    #[test]
    fn should_reject_calls_on_non_members() {
        assert!(binding_error("self()").contains("can be called"));
    }

    #[test]
    fn should_name_the_offending_source() {
        let err = Parser::new().parse_binding("self.a +").unwrap_err();
        assert_eq!(err.source_text(), Some("self.a +"));
        assert!(matches!(err, CompileError::Expression { .. }));
    }

    #[test]
    fn should_reject_trailing_tokens() {
        assert!(binding_error("self.a self.b").contains("Unexpected token"));
        assert!(binding_error("(self.a").contains("Expected ')'"));
        assert!(binding_error("").contains("Empty expression"));
    }
}
