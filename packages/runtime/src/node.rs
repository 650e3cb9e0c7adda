//! Runtime nodes
//!
//! Every entry of the runtime's node arena is one of three variants:
//! a custom component instance, a plain markup element, or a text leaf.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use trellis_compiler::{Role, Value};

use crate::backend::ElementId;
use crate::component::{Component, ComponentClass};
use crate::handle::Handle;
use crate::property::{Observer, ObservableProperty, OwnerId, PropertySchema};

pub type NodeId = Handle<Node>;

/// Handle of a node's element, the `this` role of an expression.
pub type ElementHandle = Handle<ElementId>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// The four roles an expression resolves against, as handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeContext {
    pub current: NodeId,
    pub parent: Option<NodeId>,
    pub root: Option<NodeId>,
    pub this: Option<ElementHandle>,
}

impl ScopeContext {
    pub fn new(current: NodeId) -> Self {
        ScopeContext {
            current,
            parent: None,
            root: None,
            this: None,
        }
    }

    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_this(mut self, this: Option<ElementHandle>) -> Self {
        self.this = this;
        self
    }

    /// Node behind a node-valued role. `this` is an element, never a node.
    pub fn node(&self, role: Role) -> Option<NodeId> {
        match role {
            Role::Current => Some(self.current),
            Role::Parent => self.parent,
            Role::Root => self.root,
            Role::This => None,
        }
    }
}

pub struct ComponentNode {
    pub(crate) class: Rc<ComponentClass>,
    pub(crate) behavior: Option<Rc<dyn Component>>,
    pub(crate) style_child: Option<NodeId>,
    /// Component whose template created this instance.
    pub(crate) enclosing: Option<NodeId>,
}

pub enum NodeKind {
    Component(ComponentNode),
    Element,
    Text { dynamic: bool },
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Component(component) => f
                .debug_struct("Component")
                .field("class", &component.class.name())
                .field("behavior", &component.behavior.is_some())
                .field("style_child", &component.style_child)
                .finish(),
            NodeKind::Element => f.write_str("Element"),
            NodeKind::Text { dynamic } => f.debug_struct("Text").field("dynamic", dynamic).finish(),
        }
    }
}

/// An observer this node's bindings installed on some owner's property.
pub(crate) struct InstalledBinding {
    pub(crate) property: Rc<ObservableProperty<Value>>,
    pub(crate) owner: OwnerId,
    pub(crate) observer: Observer<Value>,
}

pub struct Node {
    pub(crate) owner: OwnerId,
    pub(crate) kind: NodeKind,
    pub(crate) tag: String,
    pub(crate) element: Option<ElementId>,
    pub(crate) element_handle: Option<ElementHandle>,
    /// Element taken off the node by unmount, kept until it is released.
    pub(crate) detached: Option<ElementId>,
    /// Events bound on the element, unbound when the node is destroyed.
    pub(crate) events: Vec<String>,
    pub(crate) props: Rc<PropertySchema>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) ids: IndexMap<String, NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) root: Option<NodeId>,
    pub(crate) context: Option<ScopeContext>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) bindings: Vec<InstalledBinding>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, tag: impl Into<String>, props: Rc<PropertySchema>) -> Self {
        Node {
            owner: OwnerId::next(),
            kind,
            tag: tag.into(),
            element: None,
            element_handle: None,
            detached: None,
            events: Vec::new(),
            props,
            children: Vec::new(),
            ids: IndexMap::new(),
            parent: None,
            root: None,
            context: None,
            lifecycle: Lifecycle::Created,
            bindings: Vec::new(),
        }
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is_component(&self) -> bool {
        matches!(self.kind, NodeKind::Component(_))
    }

    /// Whether this is a leaf whose content is bound to an expression.
    pub fn is_dynamic_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { dynamic: true })
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub(crate) fn component(&self) -> Option<&ComponentNode> {
        match &self.kind {
            NodeKind::Component(component) => Some(component),
            _ => None,
        }
    }

    pub(crate) fn component_mut(&mut self) -> Option<&mut ComponentNode> {
        match &mut self.kind {
            NodeKind::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Short label for logs and errors.
    pub fn describe(&self) -> String {
        match &self.kind {
            NodeKind::Component(component) => format!("{}#{}", component.class.name(), self.owner),
            NodeKind::Element => format!("<{}>#{}", self.tag.to_ascii_lowercase(), self.owner),
            NodeKind::Text { .. } => format!("text#{}", self.owner),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("owner", &self.owner)
            .field("kind", &self.kind)
            .field("element", &self.element)
            .field("children", &self.children)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}
