use std::borrow::Cow;
use std::fmt;

use itertools::Itertools;
use serde_json::Value;
use tracing::debug;

use crate::context::{Context, Scope};
use crate::errors::{EvalError, Result};
use crate::functions::Registry;

/// Runtime type of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Boolean,
            Value::Number(_) => ValueType::Number,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Object(_) => ValueType::Object,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Null => "null",
            ValueType::Boolean => "boolean",
            ValueType::Number => "number",
            ValueType::String => "string",
            ValueType::Array => "array",
            ValueType::Object => "object",
        })
    }
}

/// Evaluate an expression.
///
/// An array whose first element names a registered interpreter is a call;
/// the remaining elements are handed to the interpreter unevaluated. Any
/// other value is a literal.
pub fn evaluate(ctx: &Context<'_>, expr: &Value) -> Result<Value> {
    if let Some((Value::String(name), args)) = expr.as_array().and_then(|a| a.split_first()) {
        if let Some(interpreter) = ctx.interpreters.get(name) {
            debug!(interpreter = %name, args = args.len(), "dispatch");
            return interpreter.call(ctx, args);
        }
    }
    Ok(expr.clone())
}

/// Evaluate and require the result to be of type `expected`.
pub fn evaluate_typed(expected: ValueType, ctx: &Context<'_>, expr: &Value) -> Result<Value> {
    let value = evaluate(ctx, expr)?;
    check_type(&[expected], &value)?;
    Ok(value)
}

/// Parse JSON expression text and evaluate it in `scope`.
pub fn eval_str(interpreters: &Registry, scope: &Scope<'_>, text: &str) -> Result<Value> {
    let expr: Value = serde_json::from_str(text).map_err(|e| EvalError::Parse(e.to_string()))?;
    evaluate(&Context::new(interpreters, scope), &expr)
}

fn check_type(allowed: &[ValueType], value: &Value) -> Result<()> {
    let found = ValueType::of(value);
    if allowed.contains(&found) {
        Ok(())
    } else {
        Err(EvalError::Type {
            expected: allowed.iter().join(" | "),
            found,
        })
    }
}

/// How an interpreter wants one positional argument bound.
#[derive(Debug, Clone, Copy)]
pub enum Param {
    /// Evaluated, any type.
    Any,
    /// Evaluated, then checked against the listed types.
    Typed(&'static [ValueType]),
    /// Passed through as an unevaluated expression.
    Raw,
}

/// Bind call arguments to `params`.
///
/// This is the single place the "current value" default lives: when exactly
/// the last argument is missing, it is resolved to the scope's `$$VALUE`
/// binding (or `null` when unbound) before the usual evaluation and type
/// check apply.
pub fn bind_args<'e>(
    ctx: &Context<'_>,
    name: &str,
    params: &[Param],
    args: &'e [Value],
) -> Result<Vec<Cow<'e, Value>>> {
    if args.len() > params.len() || args.len() + 1 < params.len() {
        return Err(EvalError::Arity {
            name: name.to_string(),
            expected: format!("{} or {}", params.len().saturating_sub(1), params.len()),
            found: args.len(),
        });
    }

    params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let arg = match args.get(i) {
                Some(arg) => arg,
                None => {
                    let current = ctx.scope.value().cloned().unwrap_or(Value::Null);
                    if let Param::Typed(allowed) = param {
                        check_type(allowed, &current)?;
                    }
                    return Ok(Cow::Owned(current));
                }
            };
            match param {
                Param::Raw => Ok(Cow::Borrowed(arg)),
                Param::Any => evaluate(ctx, arg).map(Cow::Owned),
                Param::Typed(allowed) => {
                    let value = evaluate(ctx, arg)?;
                    check_type(allowed, &value)?;
                    Ok(Cow::Owned(value))
                }
            }
        })
        .collect()
}
