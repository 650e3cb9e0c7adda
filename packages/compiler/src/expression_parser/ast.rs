/**
 * Expression AST
 *
 * Node types produced by the expression parser and walked by the evaluator
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Value;

/// One of the four names an expression can resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Root,
    Parent,
    /// The `self` role: the component whose scope the expression runs in.
    #[serde(rename = "self")]
    Current,
    /// The `this` role: the element an attribute or event belongs to.
    This,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Root, Role::Parent, Role::Current, Role::This];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Root => "root",
            Role::Parent => "parent",
            Role::Current => "self",
            Role::This => "this",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "root" => Some(Role::Root),
            "parent" => Some(Role::Parent),
            "self" => Some(Role::Current),
            "this" => Some(Role::This),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Or,
    And,
    Nullish,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    In,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryOp {
    pub fn from_operator(op: &str) -> Option<BinaryOp> {
        let op = match op {
            "||" => BinaryOp::Or,
            "&&" => BinaryOp::And,
            "??" => BinaryOp::Nullish,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            "===" => BinaryOp::StrictEqual,
            "!==" => BinaryOp::StrictNotEqual,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEqual,
            ">=" => BinaryOp::GreaterEqual,
            "in" => BinaryOp::In,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Remainder,
            _ => return None,
        };
        Some(op)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Nullish => "??",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::In => "in",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
        }
    }
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Expr {
    Literal {
        value: Value,
    },
    Role {
        role: Role,
    },
    LiteralList {
        items: Vec<Expr>,
    },
    LiteralMap {
        entries: Vec<(String, Expr)>,
    },
    PropertyRead {
        receiver: Box<Expr>,
        name: String,
    },
    KeyedRead {
        receiver: Box<Expr>,
        key: Box<Expr>,
    },
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        true_exp: Box<Expr>,
        false_exp: Box<Expr>,
    },
    /// `role.prop = value`; only produced in action mode.
    PropertyWrite {
        receiver: Box<Expr>,
        name: String,
        value: Box<Expr>,
    },
    /// `a; b`; only produced in action mode.
    Chain {
        expressions: Vec<Expr>,
    },
    /// Literal text interleaved with expressions, joined as display strings.
    Interpolation {
        parts: Vec<Expr>,
    },
}

impl Expr {
    pub fn literal(value: impl Into<Value>) -> Expr {
        Expr::Literal {
            value: value.into(),
        }
    }

    pub fn role(role: Role) -> Expr {
        Expr::Role { role }
    }

    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::PropertyRead { .. })
    }

    /// Visit this node and every descendant, parents first.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::Literal { .. } | Expr::Role { .. } => {}
            Expr::LiteralList { items } => items.iter().for_each(|e| e.walk(visit)),
            Expr::LiteralMap { entries } => entries.iter().for_each(|(_, e)| e.walk(visit)),
            Expr::PropertyRead { receiver, .. } => receiver.walk(visit),
            Expr::KeyedRead { receiver, key } => {
                receiver.walk(visit);
                key.walk(visit);
            }
            Expr::MethodCall { receiver, args, .. } => {
                receiver.walk(visit);
                args.iter().for_each(|e| e.walk(visit));
            }
            Expr::Unary { expr, .. } => expr.walk(visit),
            Expr::Binary { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Expr::Conditional {
                condition,
                true_exp,
                false_exp,
            } => {
                condition.walk(visit);
                true_exp.walk(visit);
                false_exp.walk(visit);
            }
            Expr::PropertyWrite {
                receiver, value, ..
            } => {
                receiver.walk(visit);
                value.walk(visit);
            }
            Expr::Chain { expressions } => expressions.iter().for_each(|e| e.walk(visit)),
            Expr::Interpolation { parts } => parts.iter().for_each(|e| e.walk(visit)),
        }
    }
}
