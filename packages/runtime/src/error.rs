//! Runtime errors

use thiserror::Error;
use trellis_compiler::{CompileError, EvalError};

use crate::reconcile::ReconcileError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// A stale or never-issued handle was dereferenced. Always a lifecycle
    /// bug in the caller, so it is propagated rather than logged.
    #[error("{kind} handle {handle} is not registered")]
    HandleNotFound { kind: &'static str, handle: String },

    #[error("no component registered for tag <{tag}>")]
    ComponentNotFound { tag: String },

    #[error("'{property}' is not a property of {owner}")]
    UnknownProperty { owner: String, property: String },

    #[error("cannot bind {dependency}: {message}")]
    BindingResolution { dependency: String, message: String },

    #[error("node {node} is not mounted")]
    NotMounted { node: String },

    #[error("node {node} was unmounted and cannot be mounted again")]
    Unmounted { node: String },

    #[error("component class {class} failed to compile: {source}")]
    ClassCompile { class: String, source: CompileError },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

impl From<RuntimeError> for EvalError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Eval(inner) => inner,
            other => EvalError::Scope {
                message: other.to_string(),
            },
        }
    }
}
