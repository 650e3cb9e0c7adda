//! Filtered list
//!
//! Renders `items` as one child per value. Assigning `initial_items`
//! records the baseline order and seeds `items`; assigning `filtervalue`
//! keeps the initial items containing it (case-insensitive). Every change
//! of `items` is reconciled in place against the baseline order.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;
use trellis_compiler::Value;

use crate::component::{Component, ComponentClass, ComponentContext};
use crate::error::Result;
use crate::node::NodeId;
use crate::reconcile::{self, OrderIndex};
use crate::runtime::{Runtime, HTML_PROPERTY, VALUE_PROPERTY};

pub const NAME: &str = "FilteredList";
pub const DEFAULT_ITEM_TAG: &str = "li";

pub const INITIAL_ITEMS: &str = "initial_items";
pub const ITEMS: &str = "items";
pub const FILTER_VALUE: &str = "filtervalue";

/// The `FilteredList` class with `<li>` items.
pub fn class() -> Rc<ComponentClass> {
    class_with_item_tag(DEFAULT_ITEM_TAG)
}

/// The `FilteredList` class with items of `item_tag`: a registered
/// component name or a plain markup tag.
pub fn class_with_item_tag(item_tag: &str) -> Rc<ComponentClass> {
    let item_tag = item_tag.to_string();
    ComponentClass::builder(NAME)
        .render_tag("ul")
        .template(format!("<{0}></{0}>", NAME))
        .property(INITIAL_ITEMS, Value::List(Vec::new()))
        .property(ITEMS, Value::List(Vec::new()))
        .property(FILTER_VALUE, "")
        .behavior(move || FilteredList::new(&item_tag))
        .build()
}

pub struct FilteredList {
    order: RefCell<OrderIndex>,
    item_tag: String,
}

impl FilteredList {
    pub fn new(item_tag: &str) -> Self {
        FilteredList {
            order: RefCell::new(OrderIndex::default()),
            item_tag: item_tag.to_string(),
        }
    }

    fn apply_filter(&self, ctx: &ComponentContext, filter: &Value) -> Result<()> {
        let needle = filter.to_display().to_lowercase();
        let initial = ctx.get(INITIAL_ITEMS)?;
        let items: Vec<Value> = initial
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter(|item| needle.is_empty() || item.to_display().to_lowercase().contains(&needle))
            .cloned()
            .collect();
        ctx.set(ITEMS, Value::List(items))?;
        Ok(())
    }

    fn reset(&self, ctx: &ComponentContext, initial: &Value) -> Result<()> {
        let items = initial.as_list().unwrap_or_default().to_vec();
        *self.order.borrow_mut() = OrderIndex::new(&items);
        ctx.set(ITEMS, Value::List(items))?;
        Ok(())
    }

    fn reconcile(&self, ctx: &ComponentContext, items: &Value) -> Result<()> {
        let runtime = ctx.runtime();
        let list = ctx.node();
        let desired = items.as_list().unwrap_or_default();

        let children = runtime.content_children(list)?;
        let mut current = Vec::with_capacity(children.len());
        for child in &children {
            current.push(item_key(runtime, *child)?);
        }

        let plan = reconcile::plan(&current, desired, &self.order.borrow())?;
        for index in &plan.removed {
            runtime.remove(list, children[*index])?;
        }
        for insert in &plan.inserts {
            let item = self.create_item(runtime, &insert.value)?;
            match insert.before {
                Some(index) => runtime.insert_before(list, item, children[index])?,
                None => runtime.add(list, item)?,
            }
        }
        debug!(
            list = %runtime.describe(list),
            removed = plan.removed.len(),
            added = plan.inserts.len(),
            "items reconciled"
        );
        Ok(())
    }

    fn create_item(&self, runtime: &Runtime, value: &Value) -> Result<NodeId> {
        let custom = runtime.registered_class(&self.item_tag);
        let item = match custom {
            Some(class) => runtime.instantiate(class, None)?,
            None => runtime.create_element(&self.item_tag)?,
        };
        for name in [VALUE_PROPERTY, HTML_PROPERTY] {
            if runtime.has_property(item, name)? {
                runtime.set(item, name, value.clone())?;
            }
        }
        Ok(item)
    }
}

/// Reconciliation key of a list child.
fn item_key(runtime: &Runtime, child: NodeId) -> Result<Value> {
    if runtime.has_property(child, VALUE_PROPERTY)? {
        runtime.get(child, VALUE_PROPERTY)
    } else {
        Ok(Value::Null)
    }
}

impl Component for FilteredList {
    fn on_property_change(&self, ctx: &ComponentContext, name: &str, value: &Value) -> Result<()> {
        match name {
            FILTER_VALUE => self.apply_filter(ctx, value),
            INITIAL_ITEMS => self.reset(ctx, value),
            ITEMS => self.reconcile(ctx, value),
            _ => Ok(()),
        }
    }
}
