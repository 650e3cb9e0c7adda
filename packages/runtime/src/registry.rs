//! Component registry
//!
//! Known custom-component classes, keyed by upper-cased tag.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::component::ComponentClass;

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    classes: IndexMap<String, Rc<ComponentClass>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        ComponentRegistry::default()
    }

    /// Register `class`. Returns the class it replaced, if any.
    pub fn add(&mut self, class: Rc<ComponentClass>) -> Option<Rc<ComponentClass>> {
        let previous = self.classes.insert(class.tag().to_string(), class.clone());
        if previous.is_some() {
            warn!(tag = class.tag(), "component class replaced");
        } else {
            debug!(tag = class.tag(), class = class.name(), "component class registered");
        }
        previous
    }

    pub fn remove(&mut self, tag: &str) -> Option<Rc<ComponentClass>> {
        self.classes.shift_remove(&tag.to_ascii_uppercase())
    }

    /// Case-insensitive lookup. A miss is logged.
    pub fn get(&self, tag: &str) -> Option<Rc<ComponentClass>> {
        let found = self.find(tag);
        if found.is_none() {
            warn!(tag, "component class not found");
        }
        found
    }

    /// Case-insensitive lookup without logging, for tags that may be
    /// plain markup.
    pub fn find(&self, tag: &str) -> Option<Rc<ComponentClass>> {
        self.classes.get(&tag.to_ascii_uppercase()).cloned()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.classes.contains_key(&tag.to_ascii_uppercase())
    }

    pub fn classes(&self) -> impl Iterator<Item = &Rc<ComponentClass>> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
