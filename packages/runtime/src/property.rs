//! Observable properties
//!
//! An [`ObservableProperty`] belongs to a component class, not to an
//! instance. Per-instance values and observers live in side tables keyed
//! by [`OwnerId`].
//!
//! # Invariants
//!
//! 1. Reading an owner that was never written materializes a fresh clone
//!    of the default; instances never alias each other's containers.
//! 2. Observers run synchronously, in registration order, after the new
//!    value is stored.
//! 3. Registering the same observer twice for one owner is a no-op.
//! 4. No borrow of the side tables is held while an observer runs, so an
//!    observer may read or write any property again.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{trace, warn};
use trellis_compiler::Value;

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an object that stores property values.
/// Allocated from a monotonic counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OwnerId(u64);

impl OwnerId {
    pub fn next() -> Self {
        OwnerId(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type Observer<T> = Rc<dyn Fn(&T, OwnerId)>;

/// When a write counts as a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePolicy {
    /// Notify only when the new value differs from the stored one.
    ValueEquality,
    /// Notify on every assignment.
    AlwaysNotify,
}

/// Values a property can hold.
pub trait PropertyValue: Clone + PartialEq + 'static {
    /// Containers default to [`ChangePolicy::AlwaysNotify`].
    fn is_container(&self) -> bool {
        false
    }
}

impl PropertyValue for Value {
    fn is_container(&self) -> bool {
        Value::is_container(self)
    }
}

impl PropertyValue for bool {}
impl PropertyValue for i64 {}
impl PropertyValue for f64 {}
impl PropertyValue for String {}

impl<T: Clone + PartialEq + 'static> PropertyValue for Vec<T> {
    fn is_container(&self) -> bool {
        true
    }
}

pub struct ObservableProperty<T> {
    name: String,
    default: T,
    policy: ChangePolicy,
    storage: RefCell<HashMap<OwnerId, T>>,
    observers: RefCell<HashMap<OwnerId, Vec<Observer<T>>>>,
}

impl<T: PropertyValue> ObservableProperty<T> {
    pub fn new(name: impl Into<String>, default: T) -> Self {
        let policy = if default.is_container() {
            ChangePolicy::AlwaysNotify
        } else {
            ChangePolicy::ValueEquality
        };
        ObservableProperty {
            name: name.into(),
            default,
            policy,
            storage: RefCell::new(HashMap::new()),
            observers: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_policy(mut self, policy: ChangePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn policy(&self) -> ChangePolicy {
        self.policy
    }

    pub fn get(&self, owner: OwnerId) -> T {
        self.storage
            .borrow_mut()
            .entry(owner)
            .or_insert_with(|| self.default.clone())
            .clone()
    }

    /// Store `value` for `owner`. Returns whether observers were notified.
    pub fn set(&self, owner: OwnerId, value: T) -> bool {
        let changed = {
            let mut storage = self.storage.borrow_mut();
            let current = storage
                .entry(owner)
                .or_insert_with(|| self.default.clone());
            let changed = self.policy == ChangePolicy::AlwaysNotify || *current != value;
            if changed {
                *current = value.clone();
            }
            changed
        };
        if changed {
            self.notify(owner, &value);
        }
        changed
    }

    /// Notify observers with the current value, changed or not.
    pub fn force_change(&self, owner: OwnerId) {
        let value = self.get(owner);
        self.notify(owner, &value);
    }

    /// Returns `false` when `observer` was already registered for `owner`.
    pub fn register_observer(&self, owner: OwnerId, observer: Observer<T>) -> bool {
        let mut observers = self.observers.borrow_mut();
        let list = observers.entry(owner).or_default();
        if list.iter().any(|existing| Rc::ptr_eq(existing, &observer)) {
            return false;
        }
        list.push(observer);
        trace!(property = %self.name, %owner, count = list.len(), "observer registered");
        true
    }

    pub fn unregister_observer(&self, owner: OwnerId, observer: &Observer<T>) -> bool {
        let mut observers = self.observers.borrow_mut();
        let Some(list) = observers.get_mut(&owner) else {
            warn!(property = %self.name, %owner, "no observers to unregister");
            return false;
        };
        match list.iter().position(|existing| Rc::ptr_eq(existing, observer)) {
            Some(index) => {
                list.remove(index);
                if list.is_empty() {
                    observers.remove(&owner);
                }
                true
            }
            None => {
                warn!(property = %self.name, %owner, "observer was not registered");
                false
            }
        }
    }

    pub fn observer_count(&self, owner: OwnerId) -> usize {
        self.observers
            .borrow()
            .get(&owner)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn is_stored(&self, owner: OwnerId) -> bool {
        self.storage.borrow().contains_key(&owner)
    }

    /// Drop the stored value and observers of `owner`.
    pub fn forget(&self, owner: OwnerId) {
        self.storage.borrow_mut().remove(&owner);
        self.observers.borrow_mut().remove(&owner);
    }

    fn notify(&self, owner: OwnerId, value: &T) {
        let observers = self
            .observers
            .borrow()
            .get(&owner)
            .cloned()
            .unwrap_or_default();
        for observer in observers {
            observer(value, owner);
        }
    }
}

impl<T> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("owners", &self.storage.borrow().len())
            .finish()
    }
}

/// Ordered set of the value properties a class declares.
#[derive(Debug, Default)]
pub struct PropertySchema {
    properties: IndexMap<String, Rc<ObservableProperty<Value>>>,
}

impl PropertySchema {
    pub fn new() -> Self {
        PropertySchema::default()
    }

    /// Declare `name`, replacing an earlier declaration of the same name.
    pub fn define(&mut self, name: impl Into<String>, default: impl Into<Value>) {
        let name = name.into();
        let property = Rc::new(ObservableProperty::new(name.clone(), default.into()));
        self.properties.insert(name, property);
    }

    pub fn with(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.define(name, default);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rc<ObservableProperty<Value>>> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<ObservableProperty<Value>>> {
        self.properties.values()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Release everything stored for `owner` in every property.
    pub fn forget(&self, owner: OwnerId) {
        for property in self.properties.values() {
            property.forget(owner);
        }
    }
}
