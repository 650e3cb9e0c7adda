//! Built-in components

use std::rc::Rc;

use crate::component::ComponentClass;

pub mod filtered_list;

pub use filtered_list::FilteredList;

/// Every built-in class, ready to register.
pub fn builtin_classes() -> Vec<Rc<ComponentClass>> {
    vec![filtered_list::class()]
}
