//! Expression scopes backed by live nodes

use trellis_compiler::{EvalError, EvalResult, Role, Scope, Value};

use crate::backend::ElementId;
use crate::node::{NodeId, ScopeContext};
use crate::runtime::Runtime;

/// Resolves `self`, `parent` and `root` to nodes of the arena and `this`
/// to an element. Every access goes through the handles, so a scope never
/// outlives what it points at.
pub(crate) struct NodeScope<'a> {
    runtime: &'a Runtime,
    context: ScopeContext,
}

impl<'a> NodeScope<'a> {
    pub(crate) fn new(runtime: &'a Runtime, context: ScopeContext) -> Self {
        NodeScope { runtime, context }
    }

    fn node(&self, role: Role) -> EvalResult<NodeId> {
        self.context
            .node(role)
            .ok_or(EvalError::UnresolvedRole { role })
    }

    fn element(&self) -> EvalResult<ElementId> {
        let handle = self.context.this.ok_or(EvalError::UnresolvedRole { role: Role::This })?;
        Ok(self.runtime.resolve_element(handle)?)
    }
}

impl Scope for NodeScope<'_> {
    fn read(&self, role: Role, property: &str) -> EvalResult<Value> {
        if role == Role::This {
            let element = self.element()?;
            return Ok(self
                .runtime
                .with_backend(|backend| backend.attribute(element, property))
                .map(Value::String)
                .unwrap_or(Value::Null));
        }
        Ok(self.runtime.get(self.node(role)?, property)?)
    }

    fn write(&self, role: Role, property: &str, value: Value) -> EvalResult<()> {
        if role == Role::This {
            let element = self.element()?;
            self.runtime
                .with_backend_mut(|backend| backend.set_attribute(element, property, &value.to_display()));
            return Ok(());
        }
        self.runtime.set(self.node(role)?, property, value)?;
        Ok(())
    }

    fn call(&self, role: Role, method: &str, args: Vec<Value>) -> EvalResult<Value> {
        if role == Role::This {
            return Err(EvalError::UnknownMethod {
                method: format!("this.{}", method),
            });
        }
        self.runtime.call_method(self.node(role)?, method, args)
    }
}

/// Scope for literal values read from host attributes: no role resolves.
pub(crate) struct LiteralScope;

impl Scope for LiteralScope {
    fn read(&self, role: Role, _property: &str) -> EvalResult<Value> {
        Err(EvalError::UnresolvedRole { role })
    }

    fn write(&self, role: Role, _property: &str, _value: Value) -> EvalResult<()> {
        Err(EvalError::UnresolvedRole { role })
    }
}
