//! Instruction tree
//!
//! The compiled, immutable form of a template. One tree is shared by
//! every instance of a component class.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use std::sync::Arc;

use crate::expression_parser::CompiledExpr;

/// Attribute name that registers a child under an id in its component.
pub const CID_ATTR: &str = "cid";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Instruction {
    Text(TextInstruction),
    Dynamic(DynamicText),
    Element(ElementInstruction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInstruction {
    pub text: String,
}

/// Text content bound to an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicText {
    pub expr: CompiledExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementInstruction {
    /// Upper-cased tag name.
    pub tag: String,
    pub attributes: Vec<AttributeInstruction>,
    pub children: Vec<Instruction>,
}

impl ElementInstruction {
    /// Value of the static `cid` attribute, if declared.
    pub fn cid(&self) -> Option<&str> {
        self.attributes.iter().find_map(|attr| match attr {
            AttributeInstruction::Static { name, value } if name == CID_ATTR => {
                Some(value.as_str())
            }
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeInstruction {
    Static {
        name: String,
        value: String,
    },
    /// Interaction event handler. `source` is the raw handler text; it is
    /// evaluated when the event fires and never dependency-bound.
    Event {
        name: String,
        source: String,
        handler: CompiledExpr,
    },
    Dynamic {
        name: String,
        expr: CompiledExpr,
    },
}

impl AttributeInstruction {
    pub fn name(&self) -> &str {
        match self {
            AttributeInstruction::Static { name, .. }
            | AttributeInstruction::Event { name, .. }
            | AttributeInstruction::Dynamic { name, .. } => name,
        }
    }
}

/// Shared, immutable list of top-level instructions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstructionTree(Arc<Vec<Instruction>>);

impl InstructionTree {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        InstructionTree(Arc::new(instructions))
    }

    /// Whether both handles point at the same compiled tree.
    pub fn ptr_eq(&self, other: &InstructionTree) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for InstructionTree {
    type Target = [Instruction];

    fn deref(&self) -> &[Instruction] {
        &self.0
    }
}

impl Serialize for InstructionTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InstructionTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Instruction>::deserialize(deserializer).map(InstructionTree::new)
    }
}
