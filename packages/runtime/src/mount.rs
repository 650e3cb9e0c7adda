//! Mounting and instruction interpretation
//!
//! `mount` turns a created node into a live one. For a component this
//! walks its class's instruction tree and materializes one child per
//! instruction, wiring bindings against the component's scope.

use std::rc::Rc;

use tracing::{debug, trace, warn};
use trellis_compiler::template::CID_ATTR;
use trellis_compiler::{
    scope_style, AttributeInstruction, CompiledExpr, ElementInstruction, Instruction, Value,
};

use crate::backend::ElementId;
use crate::binding::{event_name, BindingTarget};
use crate::component::{ComponentClass, ComponentContext, STYLE_PROPERTY};
use crate::error::{Result, RuntimeError};
use crate::node::{Lifecycle, NodeId, NodeKind, ScopeContext};
use crate::runtime::{Placement, Runtime, HTML_PROPERTY};
use crate::scope::LiteralScope;

impl Runtime {
    /// Mount a created node. Markup leaves only flip their lifecycle;
    /// components interpret their template.
    pub fn mount(&self, node: NodeId) -> Result<()> {
        let (lifecycle, is_component) = self.with_node(node, |n| (n.lifecycle, n.is_component()))?;
        match lifecycle {
            Lifecycle::Mounted => Ok(()),
            Lifecycle::Unmounted => Err(RuntimeError::Unmounted {
                node: self.describe(node),
            }),
            Lifecycle::Created if is_component => self.mount_component(node),
            Lifecycle::Created => self.with_node_mut(node, |n| n.lifecycle = Lifecycle::Mounted),
        }
    }

    fn mount_component(&self, node: NodeId) -> Result<()> {
        let class = self
            .class_of(node)?
            .ok_or_else(|| RuntimeError::NotMounted {
                node: self.describe(node),
            })?;
        let element = self.ensure_element(node, &class)?;

        let owner = self.owner(node)?;
        let host_id = format!("{}_{}", class.name(), owner);
        let marker = self.inner.config.rendered_marker.clone();
        self.with_backend_mut(|backend| {
            backend.set_attribute(element, "id", &host_id);
            backend.set_attribute(element, &marker, "1");
        });

        let context = self.with_node(node, |n| {
            let enclosing = n.component().and_then(|c| c.enclosing);
            (enclosing, n.parent, n.element_handle)
        })?;
        let (enclosing, parent, this) = context;
        let parent_role = match enclosing {
            Some(enclosing) => Some(enclosing),
            None => match parent {
                Some(parent) => self.enclosing_component(parent)?,
                None => None,
            },
        };
        let scope = ScopeContext {
            current: node,
            parent: parent_role,
            root: Some(node),
            this,
        };
        self.with_node_mut(node, |n| n.context = Some(scope))?;

        if !self.get(node, STYLE_PROPERTY)?.to_display().is_empty() {
            self.mount_style(node)?;
        }

        let tree = class
            .instructions(&self.inner.compiler)
            .map_err(|source| RuntimeError::ClassCompile {
                class: class.name().to_string(),
                source,
            })?
            .clone();
        if self.inner.config.debug {
            match serde_json::to_string(&tree) {
                Ok(json) => debug!(class = class.name(), instructions = %json, "interpreting"),
                Err(err) => warn!(class = class.name(), error = %err, "instruction tree not serializable"),
            }
        }
        self.interpret(node, &tree, scope)?;

        if parent.is_none() {
            self.apply_root_attributes(node, element)?;
        }
        self.mark_mounted(node, element)
    }

    fn ensure_element(&self, node: NodeId, class: &ComponentClass) -> Result<ElementId> {
        if let Some(element) = self.element(node)? {
            return Ok(element);
        }
        let element = self.with_backend_mut(|backend| backend.create_element(class.element_tag()));
        self.register_element(node, element)?;
        Ok(element)
    }

    /// Nearest component at or above `node`.
    fn enclosing_component(&self, node: NodeId) -> Result<Option<NodeId>> {
        let mut current = Some(node);
        while let Some(id) = current {
            let (is_component, parent) = self.with_node(id, |n| (n.is_component(), n.parent))?;
            if is_component {
                return Ok(Some(id));
            }
            current = parent;
        }
        Ok(None)
    }

    /// Create the internal style child on first use, then render the
    /// scoped style text into it.
    pub(crate) fn mount_style(&self, node: NodeId) -> Result<()> {
        let style = self.get(node, STYLE_PROPERTY)?.to_display();
        let host_id = match self.element_attribute(node, "id")? {
            Some(id) => id,
            None => return Ok(()),
        };

        let child = match self.style_child(node)? {
            Some(child) => child,
            None => {
                let child = self.create_element("style")?;
                self.with_node_mut(node, |n| {
                    if let Some(component) = n.component_mut() {
                        component.style_child = Some(child);
                    }
                })?;
                self.attach(node, child, Placement::Append)?;
                child
            }
        };
        self.set(child, HTML_PROPERTY, scope_style(&style, &host_id))?;
        trace!(node = %self.describe(node), "style mounted");
        Ok(())
    }

    /// Assign the attributes already present on a root's host element as
    /// initial property values. Each failure is logged and skipped.
    fn apply_root_attributes(&self, node: NodeId, element: ElementId) -> Result<()> {
        let attributes = self.with_backend(|backend| backend.attributes(element));
        let marker = &self.inner.config.rendered_marker;
        for (name, raw) in attributes {
            if name == CID_ATTR || name == *marker || name == "id" {
                continue;
            }
            if !self.has_property(node, &name)? {
                trace!(attribute = %name, "host attribute is not a property");
                continue;
            }
            if let Err(err) = self.apply_root_attribute(node, &name, &raw) {
                warn!(node = %self.describe(node), attribute = %name, error = %err, "skipping host attribute");
            }
        }
        Ok(())
    }

    fn apply_root_attribute(&self, node: NodeId, name: &str, raw: &str) -> Result<()> {
        let trimmed = raw.trim();
        let value = match trimmed.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
            Some(inner) => CompiledExpr::binding(inner)?.evaluate(&LiteralScope)?,
            None => Value::String(raw.to_string()),
        };
        self.set(node, name, value)?;
        Ok(())
    }

    fn mark_mounted(&self, node: NodeId, element: ElementId) -> Result<()> {
        let behavior = self.with_node_mut(node, |n| {
            n.lifecycle = Lifecycle::Mounted;
            n.component().and_then(|c| c.behavior.clone())
        })?;
        let marker = self.inner.config.rendered_marker.clone();
        self.with_backend_mut(|backend| backend.set_attribute(element, &marker, "1"));
        debug!(node = %self.describe(node), "mounted");

        if let Some(behavior) = behavior {
            let ctx = ComponentContext::new(self.clone(), node);
            if let Err(err) = behavior.on_mount(&ctx) {
                warn!(node = %self.describe(node), error = %err, "mount hook failed");
            }
        }
        Ok(())
    }

    /// Materialize `instructions` as children of `container`, resolving
    /// expressions against `scope`. A child that cannot be created is
    /// logged and skipped; its siblings still render.
    pub(crate) fn interpret(&self, container: NodeId, instructions: &[Instruction], scope: ScopeContext) -> Result<()> {
        for instruction in instructions {
            let child = match instruction {
                Instruction::Text(text) => {
                    let child = self.create_text(&text.text)?;
                    self.with_node_mut(child, |n| n.lifecycle = Lifecycle::Mounted)?;
                    child
                }
                Instruction::Dynamic(dynamic) => {
                    let element = self.with_backend_mut(|backend| backend.create_text(""));
                    let child = self.create_leaf(NodeKind::Text { dynamic: true }, "#text", element)?;
                    self.with_node_mut(child, |n| n.context = Some(scope))?;
                    let target = BindingTarget::Property {
                        node: child,
                        name: HTML_PROPERTY.to_string(),
                    };
                    self.install_binding(child, target, &dynamic.expr, scope)?;
                    child
                }
                Instruction::Element(element) => {
                    let class = self.inner.registry.borrow().find(&element.tag);
                    match class {
                        Some(class) => match self.interpret_component(container, class, element, scope) {
                            Ok(child) => child,
                            Err(err) => {
                                warn!(tag = %element.tag, error = %err, "skipping component");
                                continue;
                            }
                        },
                        None => self.interpret_element(element, scope)?,
                    }
                }
            };

            if let Instruction::Element(element) = instruction {
                if let Some(cid) = element.cid() {
                    self.with_node_mut(container, |n| n.ids.insert(cid.to_string(), child))?;
                }
            }
            self.attach(container, child, Placement::Append)?;
        }
        Ok(())
    }

    fn interpret_component(
        &self,
        container: NodeId,
        class: Rc<ComponentClass>,
        element: &ElementInstruction,
        scope: ScopeContext,
    ) -> Result<NodeId> {
        let child = self.instantiate(class, None)?;
        self.with_node_mut(child, |n| {
            n.parent = Some(container);
            if let Some(component) = n.component_mut() {
                component.enclosing = Some(scope.current);
            }
        })?;

        let result = self.configure_component(child, element, scope);
        if result.is_err() {
            // Not yet attached anywhere; free it before reporting.
            let _ = self.destroy(child);
        }
        result.map(|_| child)
    }

    fn configure_component(&self, child: NodeId, element: &ElementInstruction, scope: ScopeContext) -> Result<()> {
        self.mount(child)?;

        let child_element = self.require_element(child)?;
        let attr_scope = ScopeContext {
            current: child,
            parent: Some(scope.current),
            root: scope.root,
            this: self.element_handle(child)?,
        };
        for attribute in &element.attributes {
            match attribute {
                AttributeInstruction::Static { name, .. } if name == CID_ATTR => {}
                AttributeInstruction::Static { name, value } => {
                    if self.has_property(child, name)? {
                        self.set(child, name, value.as_str())?;
                    } else {
                        self.with_backend_mut(|backend| backend.set_attribute(child_element, name, value));
                    }
                }
                AttributeInstruction::Dynamic { name, expr } => {
                    let target = BindingTarget::Property {
                        node: child,
                        name: name.clone(),
                    };
                    self.install_binding(child, target, expr, attr_scope)?;
                }
                AttributeInstruction::Event { name, handler, .. } => {
                    self.bind_event(child, event_name(name), handler, scope)?;
                }
            }
        }
        Ok(())
    }

    fn interpret_element(&self, element: &ElementInstruction, scope: ScopeContext) -> Result<NodeId> {
        let child = self.create_element(&element.tag)?;
        let handle = self.element_handle(child)?;
        let context = scope.with_this(handle);
        self.with_node_mut(child, |n| {
            n.context = Some(context);
            n.root = scope.root;
        })?;
        let dom = self.require_element(child)?;

        for attribute in &element.attributes {
            match attribute {
                AttributeInstruction::Static { name, .. } if name == CID_ATTR => {}
                AttributeInstruction::Static { name, value } => {
                    self.with_backend_mut(|backend| backend.set_attribute(dom, name, value));
                }
                AttributeInstruction::Event { name, handler, .. } => {
                    self.bind_event(child, event_name(name), handler, context)?;
                }
                AttributeInstruction::Dynamic { name, expr } => {
                    self.with_backend_mut(|backend| backend.set_attribute(dom, name, ""));
                    let target = BindingTarget::Attribute {
                        node: child,
                        name: name.clone(),
                    };
                    self.install_binding(child, target, expr, context)?;
                }
            }
        }

        self.interpret(child, &element.children, scope)?;
        self.with_node_mut(child, |n| n.lifecycle = Lifecycle::Mounted)?;
        Ok(child)
    }
}
