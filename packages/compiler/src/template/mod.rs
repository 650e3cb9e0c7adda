//! Template Module
//!
//! Template compilation into shared instruction trees

pub mod compiler;
pub mod instruction;

pub use compiler::{is_dom_event, mark_expressions, TemplateCompiler, DOM_EVENTS};
pub use instruction::{
    AttributeInstruction, DynamicText, ElementInstruction, Instruction, InstructionTree,
    TextInstruction, CID_ATTR,
};
