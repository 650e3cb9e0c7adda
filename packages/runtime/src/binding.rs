//! Dependency bindings
//!
//! A binding re-evaluates one compiled expression whenever a property it
//! reads changes, and writes the result to its target: a node property or
//! an element attribute. Event handlers are bound here too; they are
//! evaluated when the event fires and never dependency-bound.

use std::rc::Rc;

use tracing::{trace, warn};
use trellis_compiler::{CompiledExpr, Dependency, Value};

use crate::backend::EventCallback;
use crate::error::{Result, RuntimeError};
use crate::node::{InstalledBinding, NodeId, ScopeContext};
use crate::property::{ObservableProperty, Observer, OwnerId};
use crate::runtime::Runtime;
use crate::scope::NodeScope;

/// Where the value of a binding is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BindingTarget {
    /// A property of a node, e.g. the `html` of a dynamic text leaf.
    Property { node: NodeId, name: String },
    /// An attribute of a node's element.
    Attribute { node: NodeId, name: String },
}

struct Binding {
    expr: CompiledExpr,
    context: ScopeContext,
    target: BindingTarget,
}

impl Runtime {
    /// Bind `expr` to a property of `node`, resolving roles through
    /// `context`. Unresolvable dependencies are logged and skipped.
    pub fn bind_property(&self, node: NodeId, name: &str, expr: &CompiledExpr, context: ScopeContext) -> Result<()> {
        let target = BindingTarget::Property {
            node,
            name: name.to_string(),
        };
        self.install_binding(node, target, expr, context)
    }

    /// Bind `expr` to an attribute of `node`'s element.
    pub fn bind_attribute(&self, node: NodeId, name: &str, expr: &CompiledExpr, context: ScopeContext) -> Result<()> {
        let target = BindingTarget::Attribute {
            node,
            name: name.to_string(),
        };
        self.install_binding(node, target, expr, context)
    }

    /// Install one observer per dependency, then run the binding once so
    /// the target starts consistent. The observers are recorded on
    /// `holder` and unregistered when it is destroyed.
    pub(crate) fn install_binding(
        &self,
        holder: NodeId,
        target: BindingTarget,
        expr: &CompiledExpr,
        context: ScopeContext,
    ) -> Result<()> {
        let binding = Rc::new(Binding {
            expr: expr.clone(),
            context,
            target,
        });

        let weak = self.downgrade();
        let hook = binding.clone();
        let observer: Observer<Value> = Rc::new(move |_value: &Value, _owner: OwnerId| {
            if let Some(runtime) = weak.upgrade() {
                runtime.run_binding(&hook);
            }
        });

        for dependency in &expr.dependencies {
            match self.resolve_dependency(dependency, &context) {
                Ok((property, owner)) => {
                    if property.register_observer(owner, observer.clone()) {
                        trace!(dependency = %dependency, %owner, expr = %expr.source, "binding observer registered");
                    }
                    self.with_node_mut(holder, |n| {
                        n.bindings.push(InstalledBinding {
                            property,
                            owner,
                            observer: observer.clone(),
                        })
                    })?;
                }
                Err(err) => {
                    warn!(dependency = %dependency, expr = %expr.source, error = %err, "skipping unresolvable dependency");
                }
            }
        }

        self.run_binding(&binding);
        Ok(())
    }

    fn resolve_dependency(
        &self,
        dependency: &Dependency,
        context: &ScopeContext,
    ) -> Result<(Rc<ObservableProperty<Value>>, OwnerId)> {
        let node = context
            .node(dependency.role)
            .ok_or_else(|| RuntimeError::BindingResolution {
                dependency: dependency.to_string(),
                message: format!("role '{}' is not bound", dependency.role.as_str()),
            })?;
        self.property(node, &dependency.property)
            .map_err(|err| RuntimeError::BindingResolution {
                dependency: dependency.to_string(),
                message: err.to_string(),
            })
    }

    fn run_binding(&self, binding: &Binding) {
        let value = match binding.expr.evaluate(&NodeScope::new(self, binding.context)) {
            Ok(value) => value,
            Err(err) => {
                warn!(expr = %binding.expr.source, error = %err, "binding evaluation failed");
                return;
            }
        };
        trace!(expr = %binding.expr.source, value = %value, "binding evaluated");

        let written = match &binding.target {
            BindingTarget::Property { node, name } => self.set(*node, name, value).map(|_| ()),
            BindingTarget::Attribute { node, name } => self.require_element(*node).map(|element| {
                let text = value.to_display();
                self.with_backend_mut(|backend| backend.set_attribute(element, name, &text));
            }),
        };
        if let Err(err) = written {
            warn!(expr = %binding.expr.source, target = ?binding.target, error = %err, "binding target unavailable");
        }
    }

    /// Bind an interaction event on `node`'s element. The handler is
    /// evaluated against `context` each time the event fires.
    pub(crate) fn bind_event(&self, node: NodeId, event: &str, handler: &CompiledExpr, context: ScopeContext) -> Result<()> {
        let element = self.require_element(node)?;
        let weak = self.downgrade();
        let handler = handler.clone();
        let callback: EventCallback = Rc::new(move |event: &str| {
            let Some(runtime) = weak.upgrade() else {
                return;
            };
            if let Err(err) = handler.evaluate(&NodeScope::new(&runtime, context)) {
                warn!(event, handler = %handler.source, error = %err, "event handler failed");
            }
        });
        self.with_backend_mut(|backend| backend.bind_event(element, event, callback));
        self.with_node_mut(node, |n| {
            if !n.events.iter().any(|bound| bound == event) {
                n.events.push(event.to_string());
            }
        })?;
        trace!(node = %node, event, "event bound");
        Ok(())
    }
}

/// Strip the `on` prefix of an event attribute name (`onclick` -> `click`).
pub(crate) fn event_name(attribute: &str) -> &str {
    attribute.strip_prefix("on").unwrap_or(attribute)
}

