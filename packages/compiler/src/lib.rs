#![deny(clippy::all)]

/**
 * Trellis Compiler
 *
 * Turns component templates into immutable instruction trees and
 * template expressions into evaluable ASTs with dependency sets.
 */

pub mod chars;
pub mod config;
mod error;
pub mod parse_util;
pub mod style;
pub mod value;

// Parser modules
pub mod expression_parser;
pub mod ml_parser;
pub mod template;

// Re-exports
pub use config::CompilerOptions;
pub use error::{CompileError, EvalError, Result};
pub use expression_parser::{CompiledExpr, Dependency, EvalResult, Expr, Role, Scope};
pub use template::{
    AttributeInstruction, ElementInstruction, Instruction, InstructionTree, TemplateCompiler,
};
pub use style::scope_style;
pub use value::Value;

/// Compile a template with default options.
pub fn compile_template(markup: &str) -> Result<InstructionTree> {
    TemplateCompiler::new(CompilerOptions::default()).compile(markup)
}

/// Compile a single binding expression.
pub fn compile_expression(source: &str) -> Result<CompiledExpr> {
    CompiledExpr::binding(source)
}
