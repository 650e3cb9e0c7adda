/**
 * Expression Evaluator
 *
 * Tree-walking interpreter for parsed expressions. Role access goes
 * through a `Scope`; everything else operates on plain `Value`s.
 */

use indexmap::IndexMap;

use super::ast::{BinaryOp, Expr, Role, UnaryOp};
use crate::error::EvalError;
use crate::value::Value;

pub type EvalResult<T> = std::result::Result<T, EvalError>;

/// The four roles an expression resolves against.
///
/// Methods take `&self`: implementations are expected to reach live state
/// through shared handles, and a write may synchronously trigger observers
/// that read through the same scope again.
pub trait Scope {
    fn read(&self, role: Role, property: &str) -> EvalResult<Value>;

    fn write(&self, role: Role, property: &str, value: Value) -> EvalResult<()>;

    fn call(&self, role: Role, method: &str, args: Vec<Value>) -> EvalResult<Value> {
        let _ = args;
        Err(EvalError::UnknownMethod {
            method: format!("{}.{}", role, method),
        })
    }
}

/// Evaluate `expr` against `scope`.
pub fn evaluate(expr: &Expr, scope: &dyn Scope) -> EvalResult<Value> {
    match expr {
        Expr::Literal { value } => Ok(value.clone()),
        Expr::Role { role } => Err(EvalError::type_error(format!(
            "role '{}' cannot be used as a value",
            role
        ))),
        Expr::LiteralList { items } => items
            .iter()
            .map(|item| evaluate(item, scope))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::List),
        Expr::LiteralMap { entries } => {
            let mut map = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                map.insert(key.clone(), evaluate(value, scope)?);
            }
            Ok(Value::Map(map))
        }
        Expr::PropertyRead { receiver, name } => match receiver.as_ref() {
            Expr::Role { role } => scope.read(*role, name),
            other => read_member(&evaluate(other, scope)?, name),
        },
        Expr::KeyedRead { receiver, key } => {
            let key = evaluate(key, scope)?;
            match receiver.as_ref() {
                Expr::Role { role } => scope.read(*role, &key.to_display()),
                other => read_keyed(&evaluate(other, scope)?, &key),
            }
        }
        Expr::MethodCall {
            receiver,
            method,
            args,
        } => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, scope))
                .collect::<EvalResult<Vec<_>>>()?;
            match receiver.as_ref() {
                Expr::Role { role } => scope.call(*role, method, args),
                other => call_builtin(&evaluate(other, scope)?, method, &args),
            }
        }
        Expr::Unary { op, expr } => {
            let value = evaluate(expr, scope)?;
            match op {
                UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
                UnaryOp::Minus => Ok(Value::Number(-number_operand(&value, "-")?)),
                UnaryOp::Plus => Ok(Value::Number(number_operand(&value, "+")?)),
            }
        }
        Expr::Binary { op, left, right } => evaluate_binary(*op, left, right, scope),
        Expr::Conditional {
            condition,
            true_exp,
            false_exp,
        } => {
            if evaluate(condition, scope)?.is_truthy() {
                evaluate(true_exp, scope)
            } else {
                evaluate(false_exp, scope)
            }
        }
        Expr::PropertyWrite {
            receiver,
            name,
            value,
        } => {
            let Expr::Role { role } = receiver.as_ref() else {
                return Err(EvalError::NotAssignable);
            };
            let value = evaluate(value, scope)?;
            scope.write(*role, name, value.clone())?;
            Ok(value)
        }
        Expr::Chain { expressions } => {
            let mut last = Value::Null;
            for expression in expressions {
                last = evaluate(expression, scope)?;
            }
            Ok(last)
        }
        Expr::Interpolation { parts } => {
            let mut text = String::new();
            for part in parts {
                text.push_str(&evaluate(part, scope)?.to_display());
            }
            Ok(Value::String(text))
        }
    }
}

fn evaluate_binary(op: BinaryOp, left: &Expr, right: &Expr, scope: &dyn Scope) -> EvalResult<Value> {
    // Short-circuiting operators yield an operand, not a boolean
    match op {
        BinaryOp::Or => {
            let left = evaluate(left, scope)?;
            return if left.is_truthy() {
                Ok(left)
            } else {
                evaluate(right, scope)
            };
        }
        BinaryOp::And => {
            let left = evaluate(left, scope)?;
            return if left.is_truthy() {
                evaluate(right, scope)
            } else {
                Ok(left)
            };
        }
        BinaryOp::Nullish => {
            let left = evaluate(left, scope)?;
            return if left.is_null() {
                evaluate(right, scope)
            } else {
                Ok(left)
            };
        }
        _ => {}
    }

    let left = evaluate(left, scope)?;
    let right = evaluate(right, scope)?;
    binary(op, &left, &right)
}

/// Apply a non short-circuiting binary operator.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    let symbol = op.as_str();
    let value = match op {
        BinaryOp::Add => match (left, right) {
            (Value::String(_), _) | (_, Value::String(_)) => {
                Value::String(format!("{}{}", left.to_display(), right.to_display()))
            }
            (Value::List(a), Value::List(b)) => {
                Value::List(a.iter().chain(b.iter()).cloned().collect())
            }
            _ => Value::Number(number_operand(left, symbol)? + number_operand(right, symbol)?),
        },
        BinaryOp::Subtract => {
            Value::Number(number_operand(left, symbol)? - number_operand(right, symbol)?)
        }
        BinaryOp::Multiply => {
            Value::Number(number_operand(left, symbol)? * number_operand(right, symbol)?)
        }
        BinaryOp::Divide => {
            Value::Number(number_operand(left, symbol)? / number_operand(right, symbol)?)
        }
        BinaryOp::Remainder => {
            Value::Number(number_operand(left, symbol)? % number_operand(right, symbol)?)
        }
        BinaryOp::Equal => Value::Bool(loose_equals(left, right)),
        BinaryOp::NotEqual => Value::Bool(!loose_equals(left, right)),
        BinaryOp::StrictEqual => Value::Bool(left == right),
        BinaryOp::StrictNotEqual => Value::Bool(left != right),
        BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEqual | BinaryOp::GreaterEqual => {
            Value::Bool(compare(op, left, right)?)
        }
        BinaryOp::In => Value::Bool(contains(right, left)?),
        BinaryOp::Or if left.is_truthy() => left.clone(),
        BinaryOp::And if !left.is_truthy() => left.clone(),
        BinaryOp::Nullish if !left.is_null() => left.clone(),
        BinaryOp::Or | BinaryOp::And | BinaryOp::Nullish => right.clone(),
    };
    Ok(value)
}

fn number_operand(value: &Value, op: &str) -> EvalResult<f64> {
    value.to_number().ok_or_else(|| {
        EvalError::type_error(format!(
            "cannot apply '{}' to a {}",
            op,
            value.type_name()
        ))
    })
}

fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_))
        | (Value::Bool(_), Value::Number(_))
        | (Value::Number(_), Value::Bool(_)) => match (left.to_number(), right.to_number()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => left == right,
    }
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<bool> {
    let ordering = match (left, right) {
        (Value::String(a), Value::String(b)) => a.partial_cmp(b),
        _ => {
            let a = number_operand(left, op.as_str())?;
            let b = number_operand(right, op.as_str())?;
            a.partial_cmp(&b)
        }
    };
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        BinaryOp::Less => ordering.is_lt(),
        BinaryOp::Greater => ordering.is_gt(),
        BinaryOp::LessEqual => ordering.is_le(),
        _ => ordering.is_ge(),
    })
}

fn contains(container: &Value, needle: &Value) -> EvalResult<bool> {
    match container {
        Value::List(items) => Ok(items.iter().any(|item| loose_equals(item, needle))),
        Value::Map(entries) => Ok(entries.contains_key(&needle.to_display())),
        Value::String(s) => Ok(s.contains(&needle.to_display())),
        other => Err(EvalError::type_error(format!(
            "cannot search a {}",
            other.type_name()
        ))),
    }
}

fn read_member(receiver: &Value, name: &str) -> EvalResult<Value> {
    match (receiver, name) {
        (Value::String(s), "length") => Ok(Value::from(s.chars().count())),
        (Value::List(items), "length") => Ok(Value::from(items.len())),
        (Value::Map(entries), "length") => Ok(Value::from(entries.len())),
        (Value::Map(entries), key) => Ok(entries.get(key).cloned().unwrap_or_default()),
        (Value::Null, _) => Err(EvalError::type_error(format!(
            "cannot read '{}' of null",
            name
        ))),
        (other, _) => Err(EvalError::type_error(format!(
            "a {} has no member '{}'",
            other.type_name(),
            name
        ))),
    }
}

fn read_keyed(receiver: &Value, key: &Value) -> EvalResult<Value> {
    match receiver {
        Value::List(items) => {
            let index = list_index(key)?;
            Ok(index
                .and_then(|i| items.get(i))
                .cloned()
                .unwrap_or_default())
        }
        Value::String(s) => {
            let index = list_index(key)?;
            Ok(index
                .and_then(|i| s.chars().nth(i))
                .map(|c| Value::String(c.to_string()))
                .unwrap_or_default())
        }
        _ => read_member(receiver, &key.to_display()),
    }
}

fn list_index(key: &Value) -> EvalResult<Option<usize>> {
    let n = key
        .to_number()
        .ok_or_else(|| EvalError::type_error("index must be a number"))?;
    if n < 0.0 || n.fract() != 0.0 {
        return Ok(None);
    }
    Ok(Some(n as usize))
}

fn string_arg(args: &[Value], index: usize) -> String {
    args.get(index).map(Value::to_display).unwrap_or_default()
}

/// Methods available on plain values.
pub fn call_builtin(receiver: &Value, method: &str, args: &[Value]) -> EvalResult<Value> {
    let value = match (receiver, method) {
        (_, "length") => return read_member(receiver, "length"),
        (Value::String(s), "toLowerCase" | "lower") => Value::String(s.to_lowercase()),
        (Value::String(s), "toUpperCase" | "upper") => Value::String(s.to_uppercase()),
        (Value::String(s), "trim") => Value::String(s.trim().to_string()),
        (Value::String(s), "includes" | "contains") => {
            Value::Bool(s.contains(&string_arg(args, 0)))
        }
        (Value::String(s), "startsWith") => Value::Bool(s.starts_with(&string_arg(args, 0))),
        (Value::String(s), "endsWith") => Value::Bool(s.ends_with(&string_arg(args, 0))),
        (Value::String(s), "indexOf") => {
            let needle = string_arg(args, 0);
            match s.find(&needle) {
                Some(byte) => Value::from(s[..byte].chars().count()),
                None => Value::Number(-1.0),
            }
        }
        (Value::String(s), "split") => {
            let separator = string_arg(args, 0);
            let parts: Vec<Value> = if separator.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(separator.as_str()).map(Value::from).collect()
            };
            Value::List(parts)
        }
        (Value::List(items), "includes" | "contains") => {
            let needle = args.first().cloned().unwrap_or_default();
            Value::Bool(items.contains(&needle))
        }
        (Value::List(items), "indexOf") => {
            let needle = args.first().cloned().unwrap_or_default();
            match items.iter().position(|item| *item == needle) {
                Some(i) => Value::from(i),
                None => Value::Number(-1.0),
            }
        }
        (Value::List(items), "join") => {
            let separator = args
                .first()
                .map(Value::to_display)
                .unwrap_or_else(|| ",".to_string());
            let joined = items
                .iter()
                .map(Value::to_display)
                .collect::<Vec<_>>()
                .join(&separator);
            Value::String(joined)
        }
        _ => {
            return Err(EvalError::UnknownMethod {
                method: format!("{}.{}", receiver.type_name(), method),
            })
        }
    };
    Ok(value)
}
