//! Component runtime
//!
//! [`Runtime`] is a cloneable session handle. It owns the node arena, the
//! element-handle arena, the component registry, the render backend and
//! the scheduler.
//!
//! # Invariants
//!
//! 1. No `RefCell` borrow of the runtime is held while an observer, a
//!    component hook or an event listener runs.
//! 2. Observers and listeners capture a [`WeakRuntime`], never a strong
//!    handle, so dropping the last `Runtime` frees the session.
//! 3. A node's `children` order is its render order.
//! 4. Every id-index entry of a node points at one of its children.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};
use trellis_compiler::{EvalError, EvalResult, TemplateCompiler, Value};

use crate::backend::{ElementId, Position, RenderBackend};
use crate::component::{ComponentClass, ComponentContext, STYLE_PROPERTY};
use crate::config::RuntimeConfig;
use crate::dom::MemoryDocument;
use crate::error::{Result, RuntimeError};
use crate::handle::HandleRegistry;
use crate::node::{ComponentNode, ElementHandle, Lifecycle, Node, NodeId, NodeKind, ScopeContext};
use crate::property::{ObservableProperty, Observer, OwnerId, PropertySchema};
use crate::registry::ComponentRegistry;
use crate::scheduler::{scheduler_for, Insertion, RenderScheduler};

/// Reconciliation key of markup element and text nodes.
pub const VALUE_PROPERTY: &str = "value";
/// Inner content of markup element and text nodes.
pub const HTML_PROPERTY: &str = "html";

/// Where [`Runtime::attach`] places a child among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Append,
    Before(NodeId),
    After(NodeId),
}

pub(crate) struct RuntimeInner {
    pub(crate) config: RuntimeConfig,
    pub(crate) compiler: TemplateCompiler,
    pub(crate) nodes: RefCell<HandleRegistry<Node>>,
    pub(crate) elements: RefCell<HandleRegistry<ElementId>>,
    pub(crate) registry: RefCell<ComponentRegistry>,
    pub(crate) backend: RefCell<Box<dyn RenderBackend>>,
    pub(crate) scheduler: RefCell<Box<dyn RenderScheduler>>,
    pub(crate) node_props: Rc<PropertySchema>,
    pub(crate) roots: RefCell<Vec<NodeId>>,
}

#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Rc<RuntimeInner>,
}

#[derive(Clone)]
pub struct WeakRuntime(Weak<RuntimeInner>);

impl WeakRuntime {
    pub fn upgrade(&self) -> Option<Runtime> {
        self.0.upgrade().map(|inner| Runtime { inner })
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new(RuntimeConfig::default())
    }
}

impl Runtime {
    /// A runtime rendering into a fresh [`MemoryDocument`].
    pub fn new(config: RuntimeConfig) -> Self {
        Runtime::from_backend(config, Box::new(MemoryDocument::new()))
    }

    pub fn from_backend(config: RuntimeConfig, backend: Box<dyn RenderBackend>) -> Self {
        let scheduler = scheduler_for(config.scheduling);
        Runtime::with_parts(config, backend, scheduler)
    }

    pub fn with_parts(
        config: RuntimeConfig,
        backend: Box<dyn RenderBackend>,
        scheduler: Box<dyn RenderScheduler>,
    ) -> Self {
        let node_props = PropertySchema::new()
            .with(VALUE_PROPERTY, "")
            .with(HTML_PROPERTY, Value::Null);
        Runtime {
            inner: Rc::new(RuntimeInner {
                compiler: TemplateCompiler::new(config.compiler.clone()),
                config,
                nodes: RefCell::new(HandleRegistry::new("node")),
                elements: RefCell::new(HandleRegistry::new("element")),
                registry: RefCell::new(ComponentRegistry::new()),
                backend: RefCell::new(backend),
                scheduler: RefCell::new(scheduler),
                node_props: Rc::new(node_props),
                roots: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakRuntime {
        WeakRuntime(Rc::downgrade(&self.inner))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn compiler(&self) -> &TemplateCompiler {
        &self.inner.compiler
    }

    // ------------------------------------------------------------------
    // Backend access

    pub fn with_backend<R>(&self, f: impl FnOnce(&dyn RenderBackend) -> R) -> R {
        let backend = self.inner.backend.borrow();
        f(&**backend)
    }

    pub fn with_backend_mut<R>(&self, f: impl FnOnce(&mut dyn RenderBackend) -> R) -> R {
        let mut backend = self.inner.backend.borrow_mut();
        f(&mut **backend)
    }

    /// Run `f` against the backend when it is a [`MemoryDocument`].
    pub fn with_document<R>(&self, f: impl FnOnce(&MemoryDocument) -> R) -> Option<R> {
        let backend = self.inner.backend.borrow();
        backend.as_any().downcast_ref::<MemoryDocument>().map(f)
    }

    /// Serialized element of `node`, for in-memory documents.
    pub fn render_html(&self, node: NodeId) -> Result<Option<String>> {
        let Some(element) = self.element(node)? else {
            return Ok(None);
        };
        Ok(self.with_document(|document| document.to_html(element)))
    }

    // ------------------------------------------------------------------
    // Node access

    pub(crate) fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&Node) -> R) -> Result<R> {
        let nodes = self.inner.nodes.borrow();
        Ok(f(nodes.get(node)?))
    }

    pub(crate) fn with_node_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut Node) -> R) -> Result<R> {
        let mut nodes = self.inner.nodes.borrow_mut();
        Ok(f(nodes.get_mut(node)?))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.nodes.borrow().contains(node)
    }

    pub fn node_count(&self) -> usize {
        self.inner.nodes.borrow().len()
    }

    /// Live element handles, one per node that still owns an element.
    pub fn element_count(&self) -> usize {
        self.inner.elements.borrow().len()
    }

    pub fn describe(&self, node: NodeId) -> String {
        self.with_node(node, Node::describe)
            .unwrap_or_else(|_| format!("node {}", node))
    }

    pub fn lifecycle(&self, node: NodeId) -> Result<Lifecycle> {
        self.with_node(node, |n| n.lifecycle)
    }

    pub fn is_mounted(&self, node: NodeId) -> Result<bool> {
        self.with_node(node, Node::is_mounted)
    }

    pub fn tag(&self, node: NodeId) -> Result<String> {
        self.with_node(node, |n| n.tag.clone())
    }

    pub fn owner(&self, node: NodeId) -> Result<OwnerId> {
        self.with_node(node, |n| n.owner)
    }

    pub fn class_of(&self, node: NodeId) -> Result<Option<Rc<ComponentClass>>> {
        self.with_node(node, |n| n.component().map(|c| c.class.clone()))
    }

    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        self.with_node(node, |n| n.children.clone())
    }

    /// Children other than a component's internal style child.
    pub fn content_children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        self.with_node(node, |n| {
            let style = n.component().and_then(|c| c.style_child);
            n.children
                .iter()
                .copied()
                .filter(|child| Some(*child) != style)
                .collect()
        })
    }

    pub fn style_child(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.with_node(node, |n| n.component().and_then(|c| c.style_child))
    }

    /// Direct child registered under `cid`.
    pub fn child(&self, node: NodeId, cid: &str) -> Result<Option<NodeId>> {
        self.with_node(node, |n| n.ids.get(cid).copied())
    }

    /// Child registered under `cid` anywhere below `node`, without
    /// looking inside nested components.
    pub fn find(&self, node: NodeId, cid: &str) -> Result<Option<NodeId>> {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let (found, children) = self.with_node(current, |n| {
                let children: Vec<NodeId> = n.children.iter().rev().copied().collect();
                (n.ids.get(cid).copied(), children)
            })?;
            if found.is_some() {
                return Ok(found);
            }
            for child in children {
                if !self.with_node(child, Node::is_component)? {
                    stack.push(child);
                }
            }
        }
        Ok(None)
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.with_node(node, |n| n.parent)
    }

    pub fn root_of(&self, node: NodeId) -> Result<Option<NodeId>> {
        self.with_node(node, |n| n.root)
    }

    pub fn context(&self, node: NodeId) -> Result<Option<ScopeContext>> {
        self.with_node(node, |n| n.context)
    }

    pub fn element(&self, node: NodeId) -> Result<Option<ElementId>> {
        self.with_node(node, |n| n.element)
    }

    pub(crate) fn require_element(&self, node: NodeId) -> Result<ElementId> {
        self.element(node)?.ok_or_else(|| RuntimeError::NotMounted {
            node: self.describe(node),
        })
    }

    pub fn element_handle(&self, node: NodeId) -> Result<Option<ElementHandle>> {
        self.with_node(node, |n| n.element_handle)
    }

    /// Element behind a `this` handle.
    pub fn resolve_element(&self, handle: ElementHandle) -> Result<ElementId> {
        self.inner.elements.borrow().get(handle).copied()
    }

    pub fn element_attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        let element = self.require_element(node)?;
        Ok(self.with_backend(|backend| backend.attribute(element, name)))
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.inner.roots.borrow().clone()
    }

    // ------------------------------------------------------------------
    // Properties

    pub(crate) fn property(
        &self,
        node: NodeId,
        name: &str,
    ) -> Result<(Rc<ObservableProperty<Value>>, OwnerId)> {
        self.with_node(node, |n| match n.props.get(name) {
            Some(property) => Ok((property.clone(), n.owner)),
            None => Err(RuntimeError::UnknownProperty {
                owner: n.describe(),
                property: name.to_string(),
            }),
        })?
    }

    pub fn has_property(&self, node: NodeId, name: &str) -> Result<bool> {
        self.with_node(node, |n| n.props.contains(name))
    }

    pub fn get(&self, node: NodeId, name: &str) -> Result<Value> {
        let (property, owner) = self.property(node, name)?;
        Ok(property.get(owner))
    }

    /// Assign a property. Returns whether observers ran.
    pub fn set(&self, node: NodeId, name: &str, value: impl Into<Value>) -> Result<bool> {
        let (property, owner) = self.property(node, name)?;
        Ok(property.set(owner, value.into()))
    }

    pub fn force_change(&self, node: NodeId, name: &str) -> Result<()> {
        let (property, owner) = self.property(node, name)?;
        property.force_change(owner);
        Ok(())
    }

    /// Invoke a component method, as `self.method(args)` does in a template.
    pub fn call_method(&self, node: NodeId, method: &str, args: Vec<Value>) -> EvalResult<Value> {
        let behavior = self.with_node(node, |n| n.component().and_then(|c| c.behavior.clone()))?;
        match behavior {
            Some(behavior) => behavior.call(&ComponentContext::new(self.clone(), node), method, args),
            None => Err(EvalError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Creation

    /// Create an unmounted instance of the class registered for `tag`.
    pub fn create_component(&self, tag: &str) -> Result<NodeId> {
        let class = self.inner.registry.borrow().get(tag);
        let class = class.ok_or_else(|| RuntimeError::ComponentNotFound {
            tag: tag.to_string(),
        })?;
        self.instantiate(class, None)
    }

    pub(crate) fn instantiate(&self, class: Rc<ComponentClass>, element: Option<ElementId>) -> Result<NodeId> {
        class
            .instructions(&self.inner.compiler)
            .map_err(|source| RuntimeError::ClassCompile {
                class: class.name().to_string(),
                source,
            })?;

        let kind = NodeKind::Component(ComponentNode {
            class: class.clone(),
            behavior: class.create_behavior(),
            style_child: None,
            enclosing: None,
        });
        let node = Node::new(kind, class.tag(), class.properties().clone());
        let owner = node.owner;
        let id = self.inner.nodes.borrow_mut().add(node);
        self.with_node_mut(id, |n| n.root = Some(id))?;

        let element = match element {
            Some(element) => element,
            None => self.with_backend_mut(|backend| backend.create_element(class.element_tag())),
        };
        self.register_element(id, element)?;

        for property in class.properties().iter() {
            let weak = self.downgrade();
            let name = property.name().to_string();
            let hook: Observer<Value> = Rc::new(move |value: &Value, _owner: OwnerId| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.property_changed(id, &name, value);
                }
            });
            property.register_observer(owner, hook);
        }

        debug!(class = class.name(), node = %id, %owner, "component created");
        Ok(id)
    }

    /// Create an unmounted markup element node.
    pub fn create_element(&self, tag: &str) -> Result<NodeId> {
        let element = self.with_backend_mut(|backend| backend.create_element(tag));
        self.create_leaf(NodeKind::Element, tag, element)
    }

    /// Create an unmounted text node.
    pub fn create_text(&self, text: &str) -> Result<NodeId> {
        let element = self.with_backend_mut(|backend| backend.create_text(text));
        self.create_leaf(NodeKind::Text { dynamic: false }, "#text", element)
    }

    pub(crate) fn create_leaf(&self, kind: NodeKind, tag: &str, element: ElementId) -> Result<NodeId> {
        let node = Node::new(kind, tag.to_ascii_uppercase(), self.inner.node_props.clone());
        let owner = node.owner;
        let id = self.inner.nodes.borrow_mut().add(node);
        self.register_element(id, element)?;

        if let Some(html) = self.inner.node_props.get(HTML_PROPERTY) {
            let weak = self.downgrade();
            let hook: Observer<Value> = Rc::new(move |value: &Value, _owner: OwnerId| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.render_content(id, value);
                }
            });
            html.register_observer(owner, hook);
        }
        Ok(id)
    }

    pub(crate) fn register_element(&self, node: NodeId, element: ElementId) -> Result<ElementHandle> {
        let handle = self.inner.elements.borrow_mut().add(element);
        self.with_node_mut(node, |n| {
            n.element = Some(element);
            n.element_handle = Some(handle);
        })?;
        Ok(handle)
    }

    fn render_content(&self, node: NodeId, value: &Value) {
        match self.element(node) {
            Ok(Some(element)) => {
                let content = value.to_display();
                self.with_backend_mut(|backend| backend.set_content(element, &content));
            }
            _ => trace!(node = %node, "content change on detached node"),
        }
    }

    fn property_changed(&self, node: NodeId, name: &str, value: &Value) {
        if name == STYLE_PROPERTY && self.is_mounted(node).unwrap_or(false) {
            if let Err(err) = self.mount_style(node) {
                warn!(node = %self.describe(node), error = %err, "style update failed");
            }
        }

        let behavior = self
            .with_node(node, |n| n.component().and_then(|c| c.behavior.clone()))
            .ok()
            .flatten();
        if let Some(behavior) = behavior {
            let ctx = ComponentContext::new(self.clone(), node);
            if let Err(err) = behavior.on_property_change(&ctx, name, value) {
                warn!(node = %self.describe(node), property = name, error = %err, "property hook failed");
            }
        }
    }

    // ------------------------------------------------------------------
    // Children

    pub fn add(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.attach(parent, child, Placement::Append)
    }

    pub fn insert_before(&self, parent: NodeId, child: NodeId, sibling: NodeId) -> Result<()> {
        self.attach(parent, child, Placement::Before(sibling))
    }

    pub fn insert_after(&self, parent: NodeId, child: NodeId, sibling: NodeId) -> Result<()> {
        self.attach(parent, child, Placement::After(sibling))
    }

    /// Make `child` a child of `parent` at `placement`, mount it if needed
    /// and schedule its insertion into the live tree.
    pub fn attach(&self, parent: NodeId, child: NodeId, placement: Placement) -> Result<()> {
        let (lifecycle, placement) = {
            let mut nodes = self.inner.nodes.borrow_mut();
            let (parent_root, parent_context) = {
                let p = nodes.get(parent)?;
                (p.root, p.context)
            };
            let c = nodes.get_mut(child)?;
            let previous = c.parent.replace(parent).filter(|old| *old != parent);
            if c.is_component() {
                c.root = Some(child);
            } else {
                if c.root.is_none() {
                    c.root = parent_root;
                }
                if c.context.is_none() {
                    c.context = parent_context.map(|ctx| ctx.with_this(c.element_handle));
                }
            }
            let lifecycle = c.lifecycle;

            if let Some(old) = previous {
                if let Ok(o) = nodes.get_mut(old) {
                    o.children.retain(|id| *id != child);
                    o.ids.retain(|_, id| *id != child);
                    if let Some(component) = o.component_mut() {
                        if component.style_child == Some(child) {
                            component.style_child = None;
                        }
                    }
                }
                debug!(node = %child, from = %old, to = %parent, "child moved to a new parent");
            }

            let p = nodes.get_mut(parent)?;
            let mut placement = placement;
            if !p.children.contains(&child) {
                let index = match placement {
                    Placement::Append => None,
                    Placement::Before(sibling) => p.children.iter().position(|id| *id == sibling),
                    Placement::After(sibling) => p
                        .children
                        .iter()
                        .position(|id| *id == sibling)
                        .map(|index| index + 1),
                };
                match index {
                    Some(index) => p.children.insert(index, child),
                    None => {
                        if placement != Placement::Append {
                            warn!(node = %child, "sibling is not a child; appending");
                            placement = Placement::Append;
                        }
                        p.children.push(child);
                    }
                }
            }
            (lifecycle, placement)
        };

        match lifecycle {
            Lifecycle::Created => self.mount(child)?,
            Lifecycle::Mounted => {}
            Lifecycle::Unmounted => {
                return Err(RuntimeError::Unmounted {
                    node: self.describe(child),
                })
            }
        }
        self.render(parent, child, placement)
    }

    /// Unmount `child`, drop it from `parent` and destroy its subtree.
    pub fn remove(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.unmount(child)?;
        self.with_node_mut(parent, |p| {
            p.children.retain(|c| *c != child);
            p.ids.retain(|_, id| *id != child);
            if let Some(component) = p.component_mut() {
                if component.style_child == Some(child) {
                    component.style_child = None;
                }
            }
        })?;
        self.destroy(child)
    }

    /// Remove every child except the internal style child, and clear the
    /// id index.
    pub fn remove_all(&self, node: NodeId) -> Result<()> {
        for child in self.content_children(node)? {
            self.remove(node, child)?;
        }
        self.with_node_mut(node, |n| n.ids.clear())
    }

    /// Detach the node's element, release its element handle and run
    /// `on_unmount`. Children are left as they are.
    pub fn unmount(&self, node: NodeId) -> Result<()> {
        let lifecycle = self.lifecycle(node)?;
        if lifecycle == Lifecycle::Unmounted {
            return Ok(());
        }
        let (element, handle, behavior) = self.with_node_mut(node, |n| {
            n.lifecycle = Lifecycle::Unmounted;
            n.detached = n.element.take();
            (
                n.detached,
                n.element_handle.take(),
                n.component().and_then(|c| c.behavior.clone()),
            )
        })?;
        if let Some(element) = element {
            self.with_backend_mut(|backend| backend.remove(element));
        }
        if let Some(handle) = handle {
            self.inner.elements.borrow_mut().remove(handle)?;
        }
        debug!(node = %self.describe(node), "unmounted");

        if let (Lifecycle::Mounted, Some(behavior)) = (lifecycle, behavior) {
            let ctx = ComponentContext::new(self.clone(), node);
            if let Err(err) = behavior.on_unmount(&ctx) {
                warn!(node = %self.describe(node), error = %err, "unmount hook failed");
            }
        }
        Ok(())
    }

    /// Free `node` and its descendants: binding observers, per-owner
    /// property storage, event listeners, backend elements, element
    /// handles and arena slots.
    pub(crate) fn destroy(&self, node: NodeId) -> Result<()> {
        let mut removed = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let entry = self.inner.nodes.borrow_mut().remove(id)?;
            stack.extend(entry.children.iter().copied());
            removed.push((id, entry));
        }

        for (_, entry) in &removed {
            for binding in &entry.bindings {
                binding
                    .property
                    .unregister_observer(binding.owner, &binding.observer);
            }
        }
        for (id, entry) in &removed {
            entry.props.forget(entry.owner);
            if let Some(element) = entry.element.or(entry.detached) {
                self.with_backend_mut(|backend| {
                    for event in &entry.events {
                        backend.unbind_event(element, event);
                    }
                    backend.release(element);
                });
            }
            // Unmount takes the handle, so one still set belongs to a
            // descendant that was never unmounted on its own.
            if let Some(handle) = entry.element_handle {
                let mut elements = self.inner.elements.borrow_mut();
                if elements.contains(handle) {
                    elements.remove(handle)?;
                } else {
                    warn!(node = %id, handle = %handle, "element handle already released");
                }
            }
            self.inner.roots.borrow_mut().retain(|root| root != id);
            trace!(node = %id, owner = %entry.owner, "node destroyed");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rendering

    fn render(&self, parent: NodeId, child: NodeId, placement: Placement) -> Result<()> {
        let parent_element = self.require_element(parent)?;
        let child_element = self.require_element(child)?;
        let position = match placement {
            Placement::Append => Position::Append,
            Placement::Before(sibling) => self
                .element(sibling)?
                .map(Position::Before)
                .unwrap_or(Position::Append),
            Placement::After(sibling) => self
                .element(sibling)?
                .map(Position::After)
                .unwrap_or(Position::Append),
        };
        let insertion = Insertion {
            node: child,
            parent: parent_element,
            child: child_element,
            position,
        };
        let immediate = self.inner.scheduler.borrow_mut().schedule(insertion);
        if let Some(insertion) = immediate {
            self.apply_insertion(insertion);
        }
        Ok(())
    }

    fn apply_insertion(&self, insertion: Insertion) {
        self.with_backend_mut(|backend| {
            let position = match insertion.position {
                Position::Before(sibling) | Position::After(sibling)
                    if backend.parent(sibling) != Some(insertion.parent) =>
                {
                    warn!(element = %insertion.child, sibling = %sibling, "sibling detached; appending");
                    Position::Append
                }
                position => position,
            };
            backend.insert(insertion.parent, insertion.child, position);
        });
    }

    /// Apply every deferred insertion, oldest first. Insertions of nodes
    /// unmounted since they were scheduled are dropped.
    pub fn flush_frame(&self) -> usize {
        let queued = self.inner.scheduler.borrow_mut().drain();
        let mut applied = 0;
        for insertion in queued {
            let live = self
                .with_node(insertion.node, Node::is_mounted)
                .unwrap_or(false);
            if !live {
                debug!(node = %insertion.node, "skipping insertion of unmounted node");
                continue;
            }
            self.apply_insertion(insertion);
            applied += 1;
        }
        applied
    }

    pub fn pending_insertions(&self) -> usize {
        self.inner.scheduler.borrow().pending()
    }

    // ------------------------------------------------------------------
    // Events

    /// Fire `event` (e.g. `click`) on `element`. Returns the number of
    /// listeners that ran.
    pub fn dispatch_event(&self, element: ElementId, event: &str) -> usize {
        let listeners = self.with_backend(|backend| backend.listeners(element, event));
        for listener in &listeners {
            listener(event);
        }
        listeners.len()
    }

    pub fn dispatch(&self, node: NodeId, event: &str) -> Result<usize> {
        let element = self.require_element(node)?;
        Ok(self.dispatch_event(element, event))
    }

    /// Compile `markup` and interpret it into `node` with the node's scope.
    pub fn add_html(&self, node: NodeId, markup: &str) -> Result<()> {
        let tree = self.inner.compiler.compile_fragment(markup)?;
        let scope = self.context(node)?.ok_or_else(|| RuntimeError::NotMounted {
            node: self.describe(node),
        })?;
        self.interpret(node, &tree, scope)
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("nodes", &self.inner.nodes.borrow().len())
            .field("classes", &self.inner.registry.borrow().len())
            .finish()
    }
}
