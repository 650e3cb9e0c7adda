//! Compiler errors

use thiserror::Error;

use crate::expression_parser::Role;

pub type Result<T> = std::result::Result<T, CompileError>;

/// Build-time failure. A template that produces one of these never yields
/// a partially usable instruction tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Cannot compile expression [{source_text}]: {message}")]
    Expression { source_text: String, message: String },

    #[error("Template parse error: {message} ({location})")]
    Markup { message: String, location: String },

    #[error("Template error: {message}")]
    Template { message: String },
}

impl CompileError {
    pub fn expression(source_text: &str, message: impl Into<String>) -> Self {
        CompileError::Expression {
            source_text: source_text.to_string(),
            message: message.into(),
        }
    }

    /// The expression text this error names, if it came from an expression.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            CompileError::Expression { source_text, .. } => Some(source_text),
            _ => None,
        }
    }
}

/// Failure while evaluating a compiled expression against a scope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("scope role '{role}' is not available")]
    UnresolvedRole { role: Role },

    #[error("'{property}' is not a property of {role}")]
    UnknownProperty { role: Role, property: String },

    #[error("unknown method '{method}'")]
    UnknownMethod { method: String },

    #[error("type error: {0}")]
    Type(String),

    #[error("expression is not assignable")]
    NotAssignable,

    #[error("{message}")]
    Scope { message: String },
}

impl EvalError {
    pub fn type_error(message: impl Into<String>) -> Self {
        EvalError::Type(message.into())
    }
}
