//! In-memory document
//!
//! A [`RenderBackend`] that keeps the live tree in plain vectors. Used by
//! tests and the command-line renderer.

use std::any::Any;
use std::fmt;

use indexmap::IndexMap;
use trellis_compiler::ml_parser::{self, is_void_element, Node};
use trellis_compiler::Result as CompileResult;

use crate::backend::{ElementId, EventCallback, Position, RenderBackend};

enum NodeData {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        listeners: IndexMap<String, Vec<EventCallback>>,
        content: Option<String>,
    },
    Text {
        text: String,
    },
}

struct DocNode {
    data: NodeData,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

pub struct MemoryDocument {
    nodes: IndexMap<ElementId, DocNode>,
    next_id: u64,
    body: ElementId,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        MemoryDocument::new()
    }
}

impl MemoryDocument {
    /// An empty document holding only a `body` element.
    pub fn new() -> Self {
        let mut document = MemoryDocument {
            nodes: IndexMap::new(),
            next_id: 0,
            body: ElementId::new(0),
        };
        document.body = document.create_element("body");
        document
    }

    /// Parse a host page into the document body.
    pub fn load(markup: &str) -> CompileResult<Self> {
        let mut document = MemoryDocument::new();
        let nodes = ml_parser::parse(markup)?;
        let body = document.body;
        document.append_nodes(body, &nodes);
        Ok(document)
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Live nodes, attached or not. Released nodes are not counted.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serialize `element` and its subtree.
    pub fn to_html(&self, element: ElementId) -> String {
        let mut out = String::new();
        self.write_html(element, &mut out);
        out
    }

    pub fn inner_html(&self, element: ElementId) -> String {
        let mut out = String::new();
        self.write_inner(element, &mut out);
        out
    }

    /// Concatenated text of the subtree.
    pub fn text_content(&self, element: ElementId) -> String {
        let mut out = String::new();
        self.write_text(element, &mut out);
        out
    }

    fn append_nodes(&mut self, parent: ElementId, nodes: &[Node]) {
        for node in nodes {
            let id = match node {
                Node::Element(element) => {
                    let id = self.create_element(&element.name);
                    for attr in &element.attrs {
                        self.set_attribute(id, &attr.name, &attr.value);
                    }
                    self.append_nodes(id, &element.children);
                    id
                }
                Node::Text(text) => self.create_text(&text.value),
            };
            self.insert(parent, id, Position::Append);
        }
    }

    fn node(&self, id: ElementId) -> Option<&DocNode> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut DocNode> {
        self.nodes.get_mut(&id)
    }

    fn push(&mut self, data: NodeData) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            DocNode {
                data,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    fn detach(&mut self, element: ElementId) {
        let Some(parent) = self.node(element).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|child| *child != element);
        }
        if let Some(node) = self.node_mut(element) {
            node.parent = None;
        }
    }

    fn write_html(&self, element: ElementId, out: &mut String) {
        let Some(node) = self.node(element) else {
            return;
        };
        match &node.data {
            NodeData::Text { text } => out.push_str(&escape_text(text)),
            NodeData::Element {
                tag, attributes, ..
            } => {
                let tag = tag.to_ascii_lowercase();
                out.push('<');
                out.push_str(&tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&tag) {
                    return;
                }
                self.write_inner(element, out);
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
        }
    }

    fn write_inner(&self, element: ElementId, out: &mut String) {
        let Some(node) = self.node(element) else {
            return;
        };
        if let NodeData::Element {
            content: Some(content),
            ..
        } = &node.data
        {
            out.push_str(content);
        }
        for child in &node.children {
            self.write_html(*child, out);
        }
    }

    fn write_text(&self, element: ElementId, out: &mut String) {
        let Some(node) = self.node(element) else {
            return;
        };
        match &node.data {
            NodeData::Text { text } => out.push_str(text),
            NodeData::Element { content, .. } => {
                if let Some(content) = content {
                    out.push_str(content);
                }
                for child in &node.children {
                    self.write_text(*child, out);
                }
            }
        }
    }

    fn collect_tag(&self, element: ElementId, tag: &str, found: &mut Vec<ElementId>) {
        let Some(node) = self.node(element) else {
            return;
        };
        for child in &node.children {
            if let Some(DocNode {
                data: NodeData::Element { tag: child_tag, .. },
                ..
            }) = self.node(*child)
            {
                if child_tag.eq_ignore_ascii_case(tag) {
                    found.push(*child);
                }
                self.collect_tag(*child, tag, found);
            }
        }
    }
}

impl RenderBackend for MemoryDocument {
    fn create_element(&mut self, tag: &str) -> ElementId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_uppercase(),
            attributes: IndexMap::new(),
            listeners: IndexMap::new(),
            content: None,
        })
    }

    fn create_text(&mut self, text: &str) -> ElementId {
        self.push(NodeData::Text {
            text: text.to_string(),
        })
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(DocNode {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.node_mut(element)
        {
            attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(DocNode {
            data: NodeData::Element { attributes, .. },
            ..
        }) = self.node_mut(element)
        {
            attributes.shift_remove(name);
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        match self.node(element) {
            Some(DocNode {
                data: NodeData::Element { attributes, .. },
                ..
            }) => attributes.get(name).cloned(),
            _ => None,
        }
    }

    fn attributes(&self, element: ElementId) -> Vec<(String, String)> {
        match self.node(element) {
            Some(DocNode {
                data: NodeData::Element { attributes, .. },
                ..
            }) => attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn set_content(&mut self, element: ElementId, value: &str) {
        let children = match self.node_mut(element) {
            Some(node) => {
                match &mut node.data {
                    NodeData::Text { text } => *text = value.to_string(),
                    NodeData::Element { content, .. } => *content = Some(value.to_string()),
                }
                std::mem::take(&mut node.children)
            }
            None => return,
        };
        for child in children {
            if let Some(child) = self.node_mut(child) {
                child.parent = None;
            }
        }
    }

    fn insert(&mut self, parent: ElementId, child: ElementId, position: Position) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            return;
        }
        self.detach(child);
        let Some(node) = self.node_mut(parent) else {
            return;
        };
        let index = match position {
            Position::Append => None,
            Position::Before(sibling) => node.children.iter().position(|c| *c == sibling),
            Position::After(sibling) => node
                .children
                .iter()
                .position(|c| *c == sibling)
                .map(|index| index + 1),
        };
        match index {
            Some(index) => node.children.insert(index, child),
            None => node.children.push(child),
        }
        if let Some(child) = self.node_mut(child) {
            child.parent = Some(parent);
        }
    }

    fn remove(&mut self, element: ElementId) {
        self.detach(element);
    }

    fn release(&mut self, element: ElementId) {
        if element == self.body {
            return;
        }
        self.detach(element);
        let mut stack = vec![element];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.swap_remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    fn contains(&self, element: ElementId) -> bool {
        self.nodes.contains_key(&element)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|node| node.parent)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn bind_event(&mut self, element: ElementId, event: &str, callback: EventCallback) {
        if let Some(DocNode {
            data: NodeData::Element { listeners, .. },
            ..
        }) = self.node_mut(element)
        {
            listeners.entry(event.to_string()).or_default().push(callback);
        }
    }

    fn unbind_event(&mut self, element: ElementId, event: &str) {
        if let Some(DocNode {
            data: NodeData::Element { listeners, .. },
            ..
        }) = self.node_mut(element)
        {
            listeners.shift_remove(event);
        }
    }

    fn listeners(&self, element: ElementId, event: &str) -> Vec<EventCallback> {
        match self.node(element) {
            Some(DocNode {
                data: NodeData::Element { listeners, .. },
                ..
            }) => listeners.get(event).cloned().unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn query_tag(&self, tag: &str) -> Vec<ElementId> {
        let mut found = Vec::new();
        self.collect_tag(self.body, tag, &mut found);
        found
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        match self.node(element) {
            Some(DocNode {
                data: NodeData::Element { tag, .. },
                ..
            }) => Some(tag.clone()),
            _ => None,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.nodes.len())
            .field("body", &self.body)
            .finish()
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
