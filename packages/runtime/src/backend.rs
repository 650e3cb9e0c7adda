//! Rendering boundary
//!
//! Everything the runtime needs from a live document. The runtime never
//! holds a backend borrow while user code runs: event listeners are cloned
//! out through [`RenderBackend::listeners`] before dispatch.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Backend-issued identity of an element or text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        ElementId(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Where an inserted node lands among its parent's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Append,
    Before(ElementId),
    After(ElementId),
}

/// Interaction event listener. Receives the event name.
pub type EventCallback = Rc<dyn Fn(&str)>;

pub trait RenderBackend {
    fn create_element(&mut self, tag: &str) -> ElementId;

    fn create_text(&mut self, text: &str) -> ElementId;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: ElementId, name: &str);

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Attributes in the order they were first set.
    fn attributes(&self, element: ElementId) -> Vec<(String, String)>;

    /// Replace the element's inner content (text data for a text node).
    fn set_content(&mut self, element: ElementId, content: &str);

    /// Insert `child` under `parent`. A `Before`/`After` sibling that is
    /// not a child of `parent` makes the insertion an append.
    fn insert(&mut self, parent: ElementId, child: ElementId, position: Position);

    /// Detach `element` from its parent. Detached elements stay valid.
    fn remove(&mut self, element: ElementId);

    /// Detach `element` and free it with its subtree and listeners. The id
    /// is dead afterwards; releasing a dead id does nothing.
    fn release(&mut self, element: ElementId);

    fn contains(&self, element: ElementId) -> bool;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn children(&self, element: ElementId) -> Vec<ElementId>;

    fn bind_event(&mut self, element: ElementId, event: &str, callback: EventCallback);

    /// Remove every listener of `event` on `element`.
    fn unbind_event(&mut self, element: ElementId, event: &str);

    fn listeners(&self, element: ElementId, event: &str) -> Vec<EventCallback>;

    /// Attached elements with the given tag (case-insensitive), in
    /// document order.
    fn query_tag(&self, tag: &str) -> Vec<ElementId>;

    fn tag_name(&self, element: ElementId) -> Option<String>;

    fn as_any(&self) -> &dyn Any;
}
