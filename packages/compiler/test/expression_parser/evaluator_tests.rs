/**
 * Evaluator Tests
 *
 * Evaluation of compiled expressions against a map-backed scope
 */

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use trellis_compiler::expression_parser::{CompiledExpr, EvalResult, Fragment, Role, Scope};
    use trellis_compiler::{EvalError, Value};

    #[derive(Default)]
    struct MapScope {
        values: RefCell<HashMap<(Role, String), Value>>,
        calls: RefCell<Vec<String>>,
    }

    impl MapScope {
        fn with(mut self, role: Role, name: &str, value: impl Into<Value>) -> Self {
            self.values
                .get_mut()
                .insert((role, name.to_string()), value.into());
            self
        }

        fn get(&self, role: Role, name: &str) -> Option<Value> {
            self.values.borrow().get(&(role, name.to_string())).cloned()
        }
    }

    impl Scope for MapScope {
        fn read(&self, role: Role, property: &str) -> EvalResult<Value> {
            self.get(role, property)
                .ok_or_else(|| EvalError::UnknownProperty {
                    role,
                    property: property.to_string(),
                })
        }

        fn write(&self, role: Role, property: &str, value: Value) -> EvalResult<()> {
            self.values
                .borrow_mut()
                .insert((role, property.to_string()), value);
            Ok(())
        }

        fn call(&self, role: Role, method: &str, args: Vec<Value>) -> EvalResult<Value> {
            self.calls.borrow_mut().push(format!("{}.{}", role, method));
            match method {
                "double" => Ok(Value::Number(
                    args.first().and_then(Value::as_number).unwrap_or(0.0) * 2.0,
                )),
                _ => Err(EvalError::UnknownMethod {
                    method: method.to_string(),
                }),
            }
        }
    }

    fn eval(source: &str, scope: &MapScope) -> EvalResult<Value> {
        CompiledExpr::binding(source)
            .unwrap_or_else(|e| panic!("{}", e))
            .evaluate(scope)
    }

    #[test]
    fn should_sum_values_from_three_roles() {
        let scope = MapScope::default()
            .with(Role::Current, "b", 3)
            .with(Role::Parent, "a", 1)
            .with(Role::Root, "a", 2);
        assert_eq!(
            eval("self.b + parent.a + root.a + 10", &scope),
            Ok(Value::from(16))
        );
    }

    #[test]
    fn should_concatenate_strings() {
        let scope = MapScope::default().with(Role::Current, "name", "Ada");
        assert_eq!(
            eval("'Hello ' + self.name + '!'", &scope),
            Ok(Value::from("Hello Ada!"))
        );
        assert_eq!(eval("'n=' + 2", &scope), Ok(Value::from("n=2")));
    }

    #[test]
    fn should_apply_arithmetic_and_comparison() {
        let scope = MapScope::default();
        assert_eq!(eval("7 % 4 * 2", &scope), Ok(Value::from(6)));
        assert_eq!(eval("1 / 4", &scope), Ok(Value::from(0.25)));
        assert_eq!(eval("2 >= 2 && 1 < 2", &scope), Ok(Value::Bool(true)));
        assert_eq!(eval("'b' > 'a'", &scope), Ok(Value::Bool(true)));
        assert_eq!(eval("-(3)", &scope), Ok(Value::from(-3)));
    }

    #[test]
    fn should_short_circuit_logical_operators() {
        // The right side would fail to resolve if it were evaluated
        let scope = MapScope::default().with(Role::Current, "on", true);
        assert_eq!(
            eval("self.on || self.missing", &scope),
            Ok(Value::Bool(true))
        );
        assert_eq!(eval("!self.on && self.missing", &scope), Ok(Value::Bool(false)));
        assert_eq!(eval("0 || 'fallback'", &scope), Ok(Value::from("fallback")));
    }

    #[test]
    fn should_apply_nullish_coalescing() {
        let scope = MapScope::default()
            .with(Role::Current, "none", Value::Null)
            .with(Role::Current, "zero", 0);
        assert_eq!(eval("self.none ?? 'x'", &scope), Ok(Value::from("x")));
        assert_eq!(eval("self.zero ?? 'x'", &scope), Ok(Value::from(0)));
    }

    #[test]
    fn should_compare_loosely_and_strictly() {
        let scope = MapScope::default().with(Role::Current, "s", "2");
        assert_eq!(eval("self.s == 2", &scope), Ok(Value::Bool(true)));
        assert_eq!(eval("self.s === 2", &scope), Ok(Value::Bool(false)));
        assert_eq!(eval("self.s !== '2'", &scope), Ok(Value::Bool(false)));
    }

    #[test]
    fn should_evaluate_conditionals() {
        let scope = MapScope::default().with(Role::Current, "count", 0);
        assert_eq!(
            eval("self.count ? 'some' : 'none'", &scope),
            Ok(Value::from("none"))
        );
    }

    #[test]
    fn should_call_builtins_on_values() {
        let scope = MapScope::default()
            .with(Role::Current, "name", " Ada ")
            .with(
                Role::Current,
                "items",
                Value::from(vec!["a", "b", "c"]),
            );
        assert_eq!(
            eval("self.name.trim().toUpperCase()", &scope),
            Ok(Value::from("ADA"))
        );
        assert_eq!(eval("self.items.length", &scope), Ok(Value::from(3)));
        assert_eq!(eval("self.items.join('-')", &scope), Ok(Value::from("a-b-c")));
        assert_eq!(eval("self.items.indexOf('c')", &scope), Ok(Value::from(2)));
        assert_eq!(
            eval("'a,b'.split(',').length", &scope),
            Ok(Value::from(2))
        );
        assert_eq!(
            eval("self.name.lower().includes('ada')", &scope),
            Ok(Value::Bool(true))
        );
        assert_eq!(eval("'b' in self.items", &scope), Ok(Value::Bool(true)));
    }

    #[test]
    fn should_read_collections() {
        let scope = MapScope::default()
            .with(Role::Current, "items", Value::from(vec![10, 20]))
            .with(
                Role::Current,
                "user",
                Value::from(serde_json::json!({"name": "Ada"})),
            );
        assert_eq!(eval("self.items[1]", &scope), Ok(Value::from(20)));
        assert_eq!(eval("self.items[5]", &scope), Ok(Value::Null));
        assert_eq!(eval("self.user.name", &scope), Ok(Value::from("Ada")));
        assert_eq!(eval("self.user['name']", &scope), Ok(Value::from("Ada")));
        assert_eq!(eval("{k: 1}.k", &scope), Ok(Value::from(1)));
    }

    #[test]
    fn should_delegate_role_method_calls_to_scope() {
        let scope = MapScope::default();
        assert_eq!(eval("self.double(21)", &scope), Ok(Value::from(42)));
        assert_eq!(scope.calls.borrow().as_slice(), &["self.double".to_string()]);
    }

    #[test]
    fn should_report_unknown_methods() {
        let scope = MapScope::default().with(Role::Current, "n", 1);
        assert!(matches!(
            eval("self.n.explode()", &scope),
            Err(EvalError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn should_report_type_errors() {
        let scope = MapScope::default().with(Role::Current, "items", Value::from(vec![1]));
        assert!(matches!(
            eval("self.items - 1", &scope),
            Err(EvalError::Type(_))
        ));
    }

    #[test]
    fn should_surface_scope_errors() {
        let scope = MapScope::default();
        assert_eq!(
            eval("self.missing", &scope),
            Err(EvalError::UnknownProperty {
                role: Role::Current,
                property: "missing".to_string(),
            })
        );
    }

    #[test]
    fn should_write_through_actions() {
        let scope = MapScope::default().with(Role::Current, "count", 1);
        let action = CompiledExpr::action("self.count = self.count + 1; self.count * 10").unwrap();
        assert_eq!(action.evaluate(&scope), Ok(Value::from(20)));
        assert_eq!(scope.get(Role::Current, "count"), Some(Value::from(2)));
    }

    #[test]
    fn should_join_interpolations_as_text() {
        let scope = MapScope::default().with(Role::Current, "kind", "big");
        let expr = CompiledExpr::interpolation(
            "item {self.kind}",
            &[Fragment::Text("item "), Fragment::Expression("self.kind")],
        )
        .unwrap();
        assert_eq!(expr.evaluate(&scope), Ok(Value::from("item big")));
    }
}
