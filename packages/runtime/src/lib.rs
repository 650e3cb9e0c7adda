#![deny(clippy::all)]

/**
 * Trellis Runtime
 *
 * Observable properties, dependency bindings and the component tree.
 * Components are mounted from compiled instruction trees into a render
 * backend and kept in sync as their properties change.
 */

pub mod backend;
mod binding;
mod bootstrap;
pub mod component;
pub mod components;
pub mod config;
pub mod dom;
mod error;
pub mod handle;
mod mount;
pub mod node;
pub mod property;
pub mod reconcile;
pub mod registry;
mod runtime;
pub mod scheduler;
mod scope;

// Re-exports
pub use backend::{ElementId, EventCallback, Position, RenderBackend};
pub use bootstrap::CompileReport;
pub use component::{Component, ComponentClass, ComponentClassBuilder, ComponentContext, STYLE_PROPERTY};
pub use config::{RuntimeConfig, Scheduling, DEFAULT_RENDERED_MARKER};
pub use dom::MemoryDocument;
pub use error::{Result, RuntimeError};
pub use handle::{Handle, HandleRegistry};
pub use node::{ElementHandle, Lifecycle, Node, NodeId, NodeKind, ScopeContext};
pub use property::{ChangePolicy, ObservableProperty, Observer, OwnerId, PropertySchema, PropertyValue};
pub use reconcile::{OrderIndex, ReconcileError, ReconcilePlan};
pub use registry::ComponentRegistry;
pub use runtime::{Placement, Runtime, WeakRuntime, HTML_PROPERTY, VALUE_PROPERTY};
pub use scheduler::{FrameScheduler, ImmediateScheduler, Insertion, RenderScheduler};

pub use trellis_compiler::Value;
