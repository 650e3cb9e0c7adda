//! List reconciliation
//!
//! Computes how to turn the current list of keyed children into a desired
//! list with as little churn as possible: children whose key is no longer
//! desired are removed, everything else stays where it is, and new keys are
//! inserted in the gaps according to a fixed baseline order.
//!
//! The planner is pure. Applying the plan to nodes is the caller's job.

use std::collections::{HashMap, VecDeque};

use thiserror::Error;
use trellis_compiler::Value;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("value '{value}' is not in the baseline order")]
    UnknownValue { value: String },
}

/// Baseline position of every key, recorded once from an initial list.
/// Keys compare by their display text; the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderIndex {
    positions: HashMap<String, usize>,
}

impl OrderIndex {
    pub fn new(values: &[Value]) -> Self {
        let mut positions = HashMap::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            positions.entry(value.to_display()).or_insert(index);
        }
        OrderIndex { positions }
    }

    pub fn position(&self, value: &Value) -> Option<usize> {
        self.positions.get(&value.to_display()).copied()
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.position(value).is_some()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn require(&self, value: &Value) -> Result<usize, ReconcileError> {
        self.position(value).ok_or_else(|| ReconcileError::UnknownValue {
            value: value.to_display(),
        })
    }
}

/// A new key and the current index of the child it goes in front of.
/// `before == None` appends.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub value: Value,
    pub before: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Indices into the current list, ascending.
    pub removed: Vec<usize>,
    /// In application order.
    pub inserts: Vec<Insert>,
}

impl ReconcilePlan {
    /// Number of nodes created plus nodes removed.
    pub fn churn(&self) -> usize {
        self.removed.len() + self.inserts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.churn() == 0
    }
}

/// Plan the edits that turn `current` into `desired`.
///
/// Every desired key must be in `order`; otherwise nothing is planned and
/// [`ReconcileError::UnknownValue`] is returned.
pub fn plan(current: &[Value], desired: &[Value], order: &OrderIndex) -> Result<ReconcilePlan, ReconcileError> {
    let mut ranked = Vec::with_capacity(desired.len());
    for value in desired {
        ranked.push((order.require(value)?, value));
    }

    let mut removed = Vec::new();
    let mut kept = Vec::new();
    let mut remaining: Vec<&Value> = desired.iter().collect();
    for (index, value) in current.iter().enumerate() {
        match remaining.iter().position(|candidate| *candidate == value) {
            Some(found) => {
                remaining.remove(found);
                kept.push(index);
            }
            None => removed.push(index),
        }
    }

    // Desired keys with no child yet, in desired order.
    let mut pending: VecDeque<(usize, &Value)> = VecDeque::new();
    let mut present: Vec<&Value> = kept.iter().map(|index| &current[*index]).collect();
    for (rank, value) in ranked {
        match present.iter().position(|candidate| *candidate == value) {
            Some(found) => {
                present.remove(found);
            }
            None => pending.push_back((rank, value)),
        }
    }

    let mut inserts = Vec::with_capacity(pending.len());
    for index in kept {
        let Some(rank) = order.position(&current[index]) else {
            continue;
        };
        while let Some(&(next, value)) = pending.front() {
            if next >= rank {
                break;
            }
            inserts.push(Insert {
                value: value.clone(),
                before: Some(index),
            });
            pending.pop_front();
        }
    }
    inserts.extend(pending.into_iter().map(|(_, value)| Insert {
        value: value.clone(),
        before: None,
    }));

    Ok(ReconcilePlan { removed, inserts })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<Value> {
        items.iter().map(|item| Value::from(*item)).collect()
    }

    #[test]
    fn first_occurrence_sets_position() {
        let order = OrderIndex::new(&values(&["a", "b", "a"]));
        assert_eq!(order.position(&"a".into()), Some(0));
        assert_eq!(order.len(), 2);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let order = OrderIndex::new(&values(&["a"]));
        let err = plan(&[], &values(&["z"]), &order).unwrap_err();
        assert_eq!(err, ReconcileError::UnknownValue { value: "z".into() });
    }
}
