//! Bootstrapping
//!
//! Class registration, eager template compilation and host-page scanning.

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::ElementId;
use crate::component::ComponentClass;
use crate::error::{Result, RuntimeError};
use crate::node::NodeId;
use crate::runtime::Runtime;

/// Outcome of [`Runtime::compile_all_registered`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub compiled: Vec<String>,
    /// Classes compiled by an earlier call.
    pub skipped: Vec<String>,
    /// `(class, error)` pairs.
    pub failed: Vec<(String, String)>,
}

impl CompileReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Runtime {
    /// Register `class`, replacing a class with the same tag.
    pub fn register(&self, class: Rc<ComponentClass>) -> Option<Rc<ComponentClass>> {
        self.inner.registry.borrow_mut().add(class)
    }

    pub fn unregister(&self, tag: &str) -> Option<Rc<ComponentClass>> {
        self.inner.registry.borrow_mut().remove(tag)
    }

    pub fn is_registered(&self, tag: &str) -> bool {
        self.inner.registry.borrow().contains(tag)
    }

    /// Registered class for `tag`, without logging a miss.
    pub fn registered_class(&self, tag: &str) -> Option<Rc<ComponentClass>> {
        self.inner.registry.borrow().find(tag)
    }

    pub fn registered_classes(&self) -> Vec<Rc<ComponentClass>> {
        self.inner.registry.borrow().classes().cloned().collect()
    }

    /// Compile the template of every registered class that is not
    /// compiled yet. A class that fails stays uninitialized.
    pub fn compile_all_registered(&self) -> CompileReport {
        let mut report = CompileReport::default();
        for class in self.registered_classes() {
            if class.is_initialized() {
                report.skipped.push(class.name().to_string());
                continue;
            }
            match class.instructions(&self.inner.compiler) {
                Ok(tree) => {
                    debug!(class = class.name(), instructions = tree.len(), "template compiled");
                    report.compiled.push(class.name().to_string());
                }
                Err(err) => {
                    warn!(class = class.name(), error = %err, "template failed to compile");
                    report.failed.push((class.name().to_string(), err.to_string()));
                }
            }
        }
        report
    }

    /// Mount every backend element whose tag is a registered class and
    /// that does not carry the rendered marker yet, each as its own root.
    /// Returns the new roots; a failed mount is logged and skipped.
    pub fn scan_and_mount(&self) -> Result<Vec<NodeId>> {
        let marker = self.inner.config.rendered_marker.clone();
        let mut mounted = Vec::new();
        for class in self.registered_classes() {
            let elements = self.with_backend(|backend| {
                backend
                    .query_tag(class.tag())
                    .into_iter()
                    .filter(|element| backend.attribute(*element, &marker).is_none())
                    .collect::<Vec<_>>()
            });
            for element in elements {
                match self.mount_class(class.clone(), element) {
                    Ok(node) => mounted.push(node),
                    Err(err) => {
                        warn!(class = class.name(), element = %element, error = %err, "mount failed")
                    }
                }
            }
        }
        info!(roots = mounted.len(), "host page scanned");
        Ok(mounted)
    }

    /// Mount an instance of the class registered for `tag` onto an
    /// existing element.
    pub fn mount_root(&self, tag: &str, element: ElementId) -> Result<NodeId> {
        let class = self
            .registered_class(tag)
            .ok_or_else(|| RuntimeError::ComponentNotFound {
                tag: tag.to_string(),
            })?;
        self.mount_class(class, element)
    }

    fn mount_class(&self, class: Rc<ComponentClass>, element: ElementId) -> Result<NodeId> {
        let node = self.instantiate(class, Some(element))?;
        if let Err(err) = self.mount(node) {
            let _ = self.destroy(node);
            return Err(err);
        }
        self.inner.roots.borrow_mut().push(node);
        Ok(node)
    }
}
