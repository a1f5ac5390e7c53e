//! Pattern-matching operations for a JSON expression evaluator.
//!
//! Expressions are JSON arrays `[name, ...args]`. This crate contributes
//! `$stringMatch`, `$stringTest`, `$stringReplace` and `$stringSplit`, each
//! generic over the regex [`engine`] that backs it, plus the small host
//! evaluator they plug into.
//!
//! ```
//! use regexp_expressions::{eval, engine::Linear};
//! use serde_json::json;
//!
//! let out = eval::<Linear>("abc_adc_acdc", &json!(["$stringMatch", ["a.*?c", "g"]])).unwrap();
//! assert_eq!(out, json!(["abc", "adc", "ac"]));
//! ```

pub mod context;
pub mod engine;
pub mod errors;
pub mod expression;
pub mod functions;
pub mod pattern;

use serde_json::Value;

pub use context::{Context, Scope};
pub use engine::{Backtracking, Engine, Flags, Linear};
pub use errors::{EvalError, Result};
pub use expression::{eval_str, evaluate, evaluate_typed, ValueType};
pub use functions::{regexp::regexp_interpreters, Interpreter, Registry};
pub use pattern::{normalize, Pattern, PatternCandidate};

/// Evaluate `expr` with the built-ins and the pattern operations backed by
/// `E`, taking `value` as the current value.
pub fn eval<E: Engine>(value: impl Into<Value>, expr: &Value) -> Result<Value> {
    let registry = Registry::with_regexp::<E>();
    let scope = Scope::with_value(value);
    evaluate(&Context::new(&registry, &scope), expr)
}
