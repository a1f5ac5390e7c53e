use serde_json::Value;
use thiserror::Error;

use crate::expression::ValueType;

/// Everything that can go wrong while evaluating an expression.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Expression text was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// A pattern argument was neither a source string, a `[source, flags]`
    /// pair nor a pattern object.
    #[error("invalid pattern candidate: {0}")]
    InvalidPatternCandidate(Value),

    #[error("invalid regular expression flags: {0:?}")]
    InvalidFlags(String),

    #[error("type error: expected {expected}, found {found}")]
    Type { expected: String, found: ValueType },

    #[error("{name}: expected {expected} arguments, found {found}")]
    Arity {
        name: String,
        expected: String,
        found: usize,
    },

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    FancyRegex(#[from] fancy_regex::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
