/**
 * Expression Parser Module
 *
 * Lexer, parser, AST, dependency extraction and evaluation for the
 * expressions embedded in templates.
 */

pub mod ast;
pub mod dependencies;
pub mod evaluator;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOp, Expr, Role, UnaryOp};
pub use dependencies::{extract_dependencies, merge_dependencies, Dependency, DependencySet};
pub use evaluator::{evaluate, EvalResult, Scope};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{ParseFlags, Parser};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::value::Value;

/// A piece of an attribute value that mixes literal text and expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    Text(&'a str),
    Expression(&'a str),
}

/// An expression parsed once, together with the dependencies it reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledExpr {
    pub source: String,
    pub ast: Expr,
    pub dependencies: DependencySet,
}

impl CompiledExpr {
    /// Compile a read-only binding expression.
    pub fn binding(source: &str) -> Result<CompiledExpr> {
        let ast = Parser::new().parse_binding(source)?;
        Ok(CompiledExpr {
            source: source.to_string(),
            ast,
            dependencies: extract_dependencies(source),
        })
    }

    /// Compile an event handler. Handlers may assign and chain statements.
    pub fn action(source: &str) -> Result<CompiledExpr> {
        let ast = Parser::new().parse_action(source)?;
        Ok(CompiledExpr {
            source: source.to_string(),
            ast,
            dependencies: extract_dependencies(source),
        })
    }

    /// Compile literal text interleaved with binding expressions into one
    /// string-valued expression. `source` is the full attribute text.
    pub fn interpolation(source: &str, fragments: &[Fragment<'_>]) -> Result<CompiledExpr> {
        let parser = Parser::new();
        let mut parts = Vec::with_capacity(fragments.len());
        let mut dependencies = DependencySet::new();
        for fragment in fragments {
            match fragment {
                Fragment::Text(text) => parts.push(Expr::literal(*text)),
                Fragment::Expression(expr) => {
                    parts.push(parser.parse_binding(expr)?);
                    merge_dependencies(&mut dependencies, expr);
                }
            }
        }
        Ok(CompiledExpr {
            source: source.to_string(),
            ast: Expr::Interpolation { parts },
            dependencies,
        })
    }

    pub fn evaluate(&self, scope: &dyn Scope) -> EvalResult<Value> {
        evaluate(&self.ast, scope)
    }
}
