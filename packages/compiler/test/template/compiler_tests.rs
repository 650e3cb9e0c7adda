/**
 * Template Compiler Tests
 *
 * Instruction trees produced from component templates
 */

#[cfg(test)]
mod tests {
    use trellis_compiler::expression_parser::{Dependency, Role};
    use trellis_compiler::template::{
        AttributeInstruction, ElementInstruction, Instruction, InstructionTree, TemplateCompiler,
    };
    use trellis_compiler::{compile_template, CompileError, CompilerOptions};

    fn compile(markup: &str) -> InstructionTree {
        compile_template(markup).unwrap_or_else(|e| panic!("{} should compile: {}", markup, e))
    }

    fn element(instruction: &Instruction) -> &ElementInstruction {
        match instruction {
            Instruction::Element(element) => element,
            other => panic!("expected element, got {:?}", other),
        }
    }

    fn text(instruction: &Instruction) -> &str {
        match instruction {
            Instruction::Text(text) => &text.text,
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn should_compile_static_structure() {
        let tree = compile("<comp>Text node<li a='1' b='1'>2</li></comp>");
        assert_eq!(tree.len(), 2);
        assert_eq!(text(&tree[0]), "Text node");

        let li = element(&tree[1]);
        assert_eq!(li.tag, "LI");
        assert_eq!(
            li.attributes,
            vec![
                AttributeInstruction::Static {
                    name: "a".to_string(),
                    value: "1".to_string(),
                },
                AttributeInstruction::Static {
                    name: "b".to_string(),
                    value: "1".to_string(),
                },
            ]
        );
        assert_eq!(li.children.len(), 1);
        assert_eq!(text(&li.children[0]), "2");
    }

    #[test]
    fn should_be_deterministic() {
        let markup = "<comp>Text node<li a='1' b='1'>2</li>{self.a + parent.b}</comp>";
        let first = compile(markup);
        let second = compile(markup);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn should_split_text_into_literal_and_dynamic_fragments() {
        let tree = compile("<comp>Count: {self.count}!</comp>");
        assert_eq!(tree.len(), 3);
        assert_eq!(text(&tree[0]), "Count: ");
        let Instruction::Dynamic(dynamic) = &tree[1] else {
            panic!("expected dynamic text");
        };
        assert_eq!(dynamic.expr.source, "self.count");
        assert_eq!(
            dynamic.expr.dependencies.as_slice(),
            &[Dependency::new(Role::Current, "count")]
        );
        assert_eq!(text(&tree[2]), "!");
    }

    #[test]
    fn should_drop_empty_fragments() {
        let tree = compile("<comp>{self.a}{self.b}</comp>");
        assert_eq!(tree.len(), 2);
        assert!(tree.iter().all(|i| matches!(i, Instruction::Dynamic(_))));
    }

    #[test]
    fn should_classify_attributes() {
        let tree = compile(
            "<comp><button cid='go' class='{self.kind}' onclick='{self.count = self.count + 1}'>Go</button></comp>",
        );
        let button = element(&tree[0]);
        assert_eq!(button.cid(), Some("go"));
        assert!(matches!(
            &button.attributes[1],
            AttributeInstruction::Dynamic { name, expr } if name == "class" && expr.source == "self.kind"
        ));
        match &button.attributes[2] {
            AttributeInstruction::Event { name, source, .. } => {
                assert_eq!(name, "onclick");
                assert_eq!(source, "self.count = self.count + 1");
            }
            other => panic!("expected event, got {:?}", other),
        }
    }

    #[test]
    fn should_keep_event_attributes_without_braces_static() {
        let tree = compile("<comp><a onclick='go()'>x</a></comp>");
        assert!(matches!(
            &element(&tree[0]).attributes[0],
            AttributeInstruction::Static { .. }
        ));
    }

    #[test]
    fn should_compile_mixed_attribute_values_to_interpolation() {
        let tree = compile("<comp><li class='item {self.kind} {parent.size}'></li></comp>");
        let AttributeInstruction::Dynamic { expr, .. } = &element(&tree[0]).attributes[0] else {
            panic!("expected dynamic attribute");
        };
        assert_eq!(expr.source, "item {self.kind} {parent.size}");
        assert_eq!(
            expr.dependencies.as_slice(),
            &[
                Dependency::new(Role::Current, "kind"),
                Dependency::new(Role::Parent, "size"),
            ]
        );
    }

    #[test]
    fn should_not_start_tags_inside_expressions() {
        let tree = compile("<comp>{self.a < self.b ? 'lt' : 'ge'}</comp>");
        assert_eq!(tree.len(), 1);
        assert!(matches!(tree[0], Instruction::Dynamic(_)));
    }

    #[test]
    fn should_upper_case_custom_component_tags() {
        let tree = compile("<comp><Counter start='{self.n}'></Counter></comp>");
        assert_eq!(element(&tree[0]).tag, "COUNTER");
    }

    #[test]
    fn should_drop_whitespace_only_text_by_default() {
        let markup = "<comp>\n  <li>a</li>\n  <li>b</li>\n</comp>";
        assert_eq!(compile(markup).len(), 2);

        let preserving =
            TemplateCompiler::new(CompilerOptions::default().with_preserve_whitespace(true));
        assert_eq!(preserving.compile(markup).unwrap().len(), 5);
    }

    #[test]
    fn should_compile_empty_templates() {
        assert!(compile("").is_empty());
        assert!(compile("<comp></comp>").is_empty());
    }

    #[test]
    fn should_compile_fragments_without_a_root() {
        let tree = TemplateCompiler::default()
            .compile_fragment("<li>a</li><li>{self.b}</li>")
            .unwrap();
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn should_fail_fast_on_bad_expressions() {
        let err = compile_template("<comp><li a='{self.a +}'></li></comp>").unwrap_err();
        assert_eq!(err.source_text(), Some("self.a +"));
        assert!(err.to_string().contains("Cannot compile expression [self.a +]"));
    }

    #[test]
    fn should_fail_fast_on_bad_event_handlers() {
        let err = compile_template("<comp><b onclick='{self.go(}'></b></comp>").unwrap_err();
        assert!(matches!(err, CompileError::Expression { .. }));
    }

    #[test]
    fn should_reject_events_mixing_text_and_expressions() {
        let err = compile_template("<comp><b onclick='x {self.go()}'></b></comp>").unwrap_err();
        assert!(matches!(err, CompileError::Template { .. }));
    }

    #[test]
    fn should_reject_multiple_roots() {
        let err = compile_template("<a></a><b></b>").unwrap_err();
        assert!(err.to_string().contains("single root element"));
    }

    #[test]
    fn should_reject_malformed_markup() {
        let err = compile_template("<comp><li></comp>").unwrap_err();
        assert!(matches!(err, CompileError::Markup { .. }));
        let err = compile_template("<comp>{self.a</comp>").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn should_share_compiled_trees_cheaply() {
        let tree = compile("<comp><li>a</li></comp>");
        let shared = tree.clone();
        assert!(tree.ptr_eq(&shared));
    }

    #[test]
    fn should_serialize_tagged_instructions() {
        let tree = compile("<comp>hi<b x='1'></b></comp>");
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["kind"], "TEXT");
        assert_eq!(json[0]["text"], "hi");
        assert_eq!(json[1]["kind"], "ELEMENT");
        assert_eq!(json[1]["attributes"][0]["kind"], "STATIC");

        let back: InstructionTree = serde_json::from_value(json).unwrap();
        assert_eq!(back, tree);
    }
}
