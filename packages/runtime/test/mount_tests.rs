/**
 * Mount Tests
 *
 * Instruction interpretation, attribute bindings and host-page roots
 */

#[cfg(test)]
mod tests {
    use trellis_runtime::{
        ComponentClass, Lifecycle, MemoryDocument, NodeId, Runtime, RuntimeConfig, Value,
    };

    fn html(runtime: &Runtime, node: NodeId) -> String {
        runtime.render_html(node).unwrap().expect("in-memory backend")
    }

    fn host_id(runtime: &Runtime, node: NodeId, class: &str) -> String {
        format!("{}_{}", class, runtime.owner(node).unwrap())
    }

    #[test]
    fn should_mount_one_child_per_instruction() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Greeter")
                .template("<Greeter>Hello {self.name}</Greeter>")
                .property("name", "world")
                .build(),
        );
        let greeter = runtime.create_component("Greeter").unwrap();
        runtime.mount(greeter).unwrap();

        assert_eq!(runtime.children(greeter).unwrap().len(), 2);
        assert_eq!(runtime.lifecycle(greeter).unwrap(), Lifecycle::Mounted);
        assert_eq!(
            html(&runtime, greeter),
            format!(
                "<greeter id=\"{}\" rd=\"1\">Hello world</greeter>",
                host_id(&runtime, greeter, "Greeter")
            )
        );

        runtime.set(greeter, "name", "trellis").unwrap();
        assert!(html(&runtime, greeter).ends_with(">Hello trellis</greeter>"));
    }

    #[test]
    fn should_rebind_attribute_in_place() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Comp")
                .template("<comp><li cid='item' a='{self.a}'></li></comp>")
                .property("a", 0)
                .build(),
        );
        let comp = runtime.create_component("Comp").unwrap();
        runtime.mount(comp).unwrap();
        let li = runtime.child(comp, "item").unwrap().unwrap();
        let element = runtime.element(li).unwrap();

        assert_eq!(runtime.element_attribute(li, "a").unwrap().as_deref(), Some("0"));
        assert_eq!(runtime.element_attribute(li, "cid").unwrap(), None);

        runtime.set(comp, "a", 2).unwrap();
        assert_eq!(runtime.element_attribute(li, "a").unwrap().as_deref(), Some("2"));
        assert_eq!(runtime.element(li).unwrap(), element);
        assert_eq!(runtime.child(comp, "item").unwrap(), Some(li));
    }

    #[test]
    fn should_share_instructions_between_instances() {
        let runtime = Runtime::default();
        let class = ComponentClass::builder("Row")
            .template("<Row><td>{self.label}</td></Row>")
            .property("label", "-")
            .build();
        runtime.register(class.clone());

        let first = runtime.create_component("Row").unwrap();
        let second = runtime.create_component("Row").unwrap();
        runtime.mount(first).unwrap();
        runtime.mount(second).unwrap();
        runtime.set(second, "label", "two").unwrap();

        assert!(class.is_initialized());
        assert!(html(&runtime, first).ends_with("><td>-</td></row>"));
        assert!(html(&runtime, second).ends_with("><td>two</td></row>"));
        assert_ne!(runtime.owner(first).unwrap(), runtime.owner(second).unwrap());
    }

    #[test]
    fn should_resolve_parent_to_enclosing_component() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Outer")
                .template("<Outer><div><Inner cid='inner'></Inner></div></Outer>")
                .property("title", "outer title")
                .build(),
        );
        runtime.register(
            ComponentClass::builder("Inner")
                .template("<Inner><b>{parent.title}</b></Inner>")
                .build(),
        );
        let outer = runtime.create_component("Outer").unwrap();
        runtime.mount(outer).unwrap();

        assert_eq!(runtime.child(outer, "inner").unwrap(), None);
        let inner = runtime.find(outer, "inner").unwrap().unwrap();
        assert!(html(&runtime, inner).ends_with("><b>outer title</b></inner>"));

        runtime.set(outer, "title", "renamed").unwrap();
        assert!(html(&runtime, inner).ends_with("><b>renamed</b></inner>"));
        assert_eq!(runtime.root_of(inner).unwrap(), Some(inner));
    }

    #[test]
    fn should_pass_static_attributes_to_child_components() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Panel")
                .template("<Panel><Badge cid='badge' label='new' class='pill'></Badge></Panel>")
                .build(),
        );
        runtime.register(
            ComponentClass::builder("Badge")
                .template("<Badge>{self.label}</Badge>")
                .property("label", "")
                .build(),
        );
        let panel = runtime.create_component("Panel").unwrap();
        runtime.mount(panel).unwrap();
        let badge = runtime.child(panel, "badge").unwrap().unwrap();

        assert_eq!(runtime.get(badge, "label").unwrap(), Value::from("new"));
        assert_eq!(
            runtime.element_attribute(badge, "class").unwrap().as_deref(),
            Some("pill")
        );
        assert!(html(&runtime, badge).ends_with(">new</badge>"));
    }

    #[test]
    fn should_skip_broken_component_and_keep_siblings() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Page")
                .template("<Page><Broken></Broken><p>after</p></Page>")
                .build(),
        );
        runtime.register(
            ComponentClass::builder("Broken")
                .template("<Broken>{self.}</Broken>")
                .build(),
        );
        let page = runtime.create_component("Page").unwrap();
        runtime.mount(page).unwrap();

        assert_eq!(runtime.children(page).unwrap().len(), 1);
        assert!(html(&runtime, page).ends_with("><p>after</p></page>"));
    }

    #[test]
    fn should_mount_scoped_style_once() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Hello")
                .template("<Hello>hi</Hello>")
                .style(":host { color: red }")
                .build(),
        );
        let hello = runtime.create_component("Hello").unwrap();
        runtime.mount(hello).unwrap();
        let id = host_id(&runtime, hello, "Hello");

        let style = runtime.style_child(hello).unwrap().unwrap();
        assert_eq!(
            html(&runtime, style),
            format!("<style>#{} {{ color: red }}</style>", id)
        );
        assert_eq!(runtime.content_children(hello).unwrap().len(), 1);

        runtime.set(hello, "style", ":host { color: blue }").unwrap();
        assert_eq!(runtime.style_child(hello).unwrap(), Some(style));
        assert_eq!(
            html(&runtime, style),
            format!("<style>#{} {{ color: blue }}</style>", id)
        );
    }

    #[test]
    fn should_apply_host_attributes_to_root() {
        let document =
            MemoryDocument::load("<main><counter start='3' steps='{[1, 2]}' bad='{[1,}' title='x'></counter></main>")
                .unwrap();
        let runtime = Runtime::from_backend(RuntimeConfig::default(), Box::new(document));
        runtime.register(
            ComponentClass::builder("Counter")
                .template("<Counter>{self.start}</Counter>")
                .property("start", 0)
                .property("steps", Value::List(Vec::new()))
                .property("bad", "kept")
                .build(),
        );
        let element = runtime.with_backend(|backend| backend.query_tag("counter"))[0];
        let counter = runtime.mount_root("counter", element).unwrap();

        assert_eq!(runtime.get(counter, "start").unwrap(), Value::from("3"));
        assert_eq!(
            runtime.get(counter, "steps").unwrap(),
            Value::from(vec![1, 2])
        );
        assert_eq!(runtime.get(counter, "bad").unwrap(), Value::from("kept"));
        assert_eq!(runtime.element_attribute(counter, "title").unwrap().as_deref(), Some("x"));
        assert!(html(&runtime, counter).ends_with(">3</counter>"));
        assert_eq!(runtime.roots(), vec![counter]);
    }

    #[test]
    fn should_add_html_with_node_scope() {
        let runtime = Runtime::default();
        runtime.register(
            ComponentClass::builder("Box")
                .template("<Box></Box>")
                .property("n", 1)
                .build(),
        );
        let node = runtime.create_component("Box").unwrap();
        runtime.mount(node).unwrap();

        runtime.add_html(node, "<i cid='icon'>{self.n + 1}</i>").unwrap();
        let icon = runtime.child(node, "icon").unwrap().unwrap();
        assert_eq!(html(&runtime, icon), "<i>2</i>");

        runtime.set(node, "n", 41).unwrap();
        assert_eq!(html(&runtime, icon), "<i>42</i>");
    }
}
