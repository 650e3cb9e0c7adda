/**
 * Dependency extraction
 *
 * Finds the `(role, property)` pairs an expression reads. Only the first
 * property segment after a role is tracked, so `self.a.b` depends on
 * `self.a`. `this` is never a dependency source.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::ast::Role;

static DEPENDENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(self|parent|root)\.([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid regex")
});

/// One property an expression reads through a scope role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub role: Role,
    pub property: String,
}

impl Dependency {
    pub fn new(role: Role, property: impl Into<String>) -> Self {
        Dependency {
            role,
            property: property.into(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.role, self.property)
    }
}

pub type DependencySet = SmallVec<[Dependency; 4]>;

/// Dependencies of `source` in first-occurrence order, without duplicates.
pub fn extract_dependencies(source: &str) -> DependencySet {
    let mut found = DependencySet::new();
    merge_dependencies(&mut found, source);
    found
}

/// Append the dependencies of `source` not already in `into`.
pub fn merge_dependencies(into: &mut DependencySet, source: &str) {
    for caps in DEPENDENCY_RE.captures_iter(source) {
        let Some(role) = Role::from_name(&caps[1]) else {
            continue;
        };
        let dependency = Dependency::new(role, &caps[2]);
        if !into.contains(&dependency) {
            into.push(dependency);
        }
    }
}
