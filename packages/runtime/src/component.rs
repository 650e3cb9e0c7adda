//! Component classes and behaviour
//!
//! A [`ComponentClass`] is the shared, per-class part of a component: its
//! template (compiled once, on first use), scoped style and property
//! schema. Per-instance behaviour is a [`Component`] created by the
//! class's factory for every instance.

use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use trellis_compiler::{CompileError, EvalError, EvalResult, InstructionTree, TemplateCompiler, Value};

use crate::error::Result;
use crate::node::NodeId;
use crate::property::PropertySchema;
use crate::runtime::Runtime;

/// Name of the property every class carries for its scoped style.
pub const STYLE_PROPERTY: &str = "style";

/// Instance hooks. Methods take `&self`; implementations keep their own
/// state behind `Cell`/`RefCell` since hooks may re-enter each other.
pub trait Component {
    fn on_mount(&self, ctx: &ComponentContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    fn on_unmount(&self, ctx: &ComponentContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Runs after a declared property of this instance changed.
    fn on_property_change(&self, ctx: &ComponentContext, name: &str, value: &Value) -> Result<()> {
        let _ = (ctx, name, value);
        Ok(())
    }

    /// Method invoked from a template expression, e.g. `self.filter()`.
    fn call(&self, ctx: &ComponentContext, method: &str, args: Vec<Value>) -> EvalResult<Value> {
        let _ = (ctx, args);
        Err(EvalError::UnknownMethod {
            method: method.to_string(),
        })
    }
}

pub type BehaviorFactory = Rc<dyn Fn() -> Rc<dyn Component>>;

pub struct ComponentClass {
    name: String,
    tag: String,
    render_tag: Option<String>,
    template: String,
    properties: Rc<PropertySchema>,
    behavior: Option<BehaviorFactory>,
    instructions: OnceCell<InstructionTree>,
}

impl ComponentClass {
    pub fn builder(name: impl Into<String>) -> ComponentClassBuilder {
        ComponentClassBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upper-cased tag that identifies the class in markup.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn render_tag(&self) -> Option<&str> {
        self.render_tag.as_deref()
    }

    /// Tag of the element created for a new instance.
    pub fn element_tag(&self) -> &str {
        self.render_tag.as_deref().unwrap_or(&self.tag)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn properties(&self) -> &Rc<PropertySchema> {
        &self.properties
    }

    /// Whether the template has been compiled.
    pub fn is_initialized(&self) -> bool {
        self.instructions.get().is_some()
    }

    /// The compiled template. Compiles on first call; a failed compile
    /// leaves the class uninitialized.
    pub fn instructions(&self, compiler: &TemplateCompiler) -> std::result::Result<&InstructionTree, CompileError> {
        self.instructions
            .get_or_try_init(|| compiler.compile(&self.template))
    }

    pub(crate) fn create_behavior(&self) -> Option<Rc<dyn Component>> {
        self.behavior.as_ref().map(|factory| factory())
    }
}

impl fmt::Debug for ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("render_tag", &self.render_tag)
            .field("properties", &self.properties.names().collect::<Vec<_>>())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

pub struct ComponentClassBuilder {
    name: String,
    tag: Option<String>,
    render_tag: Option<String>,
    template: String,
    style: String,
    properties: PropertySchema,
    behavior: Option<BehaviorFactory>,
}

impl ComponentClassBuilder {
    fn new(name: impl Into<String>) -> Self {
        ComponentClassBuilder {
            name: name.into(),
            tag: None,
            render_tag: None,
            template: String::new(),
            style: String::new(),
            properties: PropertySchema::new(),
            behavior: None,
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn render_tag(mut self, tag: impl Into<String>) -> Self {
        self.render_tag = Some(tag.into());
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Default scoped style. `:host` selects the instance's element.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn property(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.properties.define(name, default);
        self
    }

    pub fn behavior<C, F>(mut self, factory: F) -> Self
    where
        C: Component + 'static,
        F: Fn() -> C + 'static,
    {
        self.behavior = Some(Rc::new(move || Rc::new(factory()) as Rc<dyn Component>));
        self
    }

    pub fn build(self) -> Rc<ComponentClass> {
        let mut properties = self.properties;
        properties.define(STYLE_PROPERTY, self.style);
        Rc::new(ComponentClass {
            tag: self.tag.unwrap_or_else(|| self.name.clone()).to_ascii_uppercase(),
            name: self.name,
            render_tag: self.render_tag,
            template: self.template,
            properties: Rc::new(properties),
            behavior: self.behavior,
            instructions: OnceCell::new(),
        })
    }
}

/// Access to the runtime from inside a component hook.
#[derive(Clone)]
pub struct ComponentContext {
    runtime: Runtime,
    node: NodeId,
}

impl ComponentContext {
    pub(crate) fn new(runtime: Runtime, node: NodeId) -> Self {
        ComponentContext { runtime, node }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.runtime.get(self.node, name)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<bool> {
        self.runtime.set(self.node, name, value.into())
    }

    pub fn force_change(&self, name: &str) -> Result<()> {
        self.runtime.force_change(self.node, name)
    }

    /// Child registered under `cid` in this component.
    pub fn child(&self, cid: &str) -> Result<Option<NodeId>> {
        self.runtime.child(self.node, cid)
    }

    pub fn children(&self) -> Result<Vec<NodeId>> {
        self.runtime.children(self.node)
    }

    pub fn add(&self, child: NodeId) -> Result<()> {
        self.runtime.add(self.node, child)
    }

    pub fn insert_before(&self, child: NodeId, sibling: NodeId) -> Result<()> {
        self.runtime.insert_before(self.node, child, sibling)
    }

    pub fn remove(&self, child: NodeId) -> Result<()> {
        self.runtime.remove(self.node, child)
    }

    pub fn remove_all(&self) -> Result<()> {
        self.runtime.remove_all(self.node)
    }

    pub fn add_html(&self, markup: &str) -> Result<()> {
        self.runtime.add_html(self.node, markup)
    }

    /// Attribute of `node`'s element, e.g. the `value` of an input.
    pub fn element_attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        self.runtime.element_attribute(node, name)
    }
}

impl fmt::Debug for ComponentContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContext")
            .field("node", &self.node)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_defaults_to_upper_cased_name() {
        let class = ComponentClass::builder("Counter").build();
        assert_eq!(class.tag(), "COUNTER");
        assert_eq!(class.element_tag(), "COUNTER");
        assert!(class.properties().contains(STYLE_PROPERTY));
    }

    #[test]
    fn failed_compile_leaves_class_uninitialized() {
        let class = ComponentClass::builder("Broken")
            .template("<Broken>{self.}</Broken>")
            .build();
        let compiler = TemplateCompiler::default();
        assert!(class.instructions(&compiler).is_err());
        assert!(!class.is_initialized());
    }
}
