//! `$stringMatch`, `$stringTest`, `$stringReplace` and `$stringSplit`.
//!
//! Each operation is generic over the matching [`Engine`]; a registry is
//! built for exactly one engine. The pattern argument accepts any shape
//! [`normalize`] accepts, and the trailing string argument defaults to the
//! current value.

use std::marker::PhantomData;

use serde_json::Value;
use tracing::trace;

use super::{as_str, Interpreter, Registry};
use crate::context::Context;
use crate::engine::Engine;
use crate::errors::Result;
use crate::expression::{bind_args, evaluate_typed, Param, ValueType};
use crate::pattern::normalize;

const STRING: &[ValueType] = &[ValueType::String];

/// Pattern candidates are classified by `normalize`, not by the binder, so a
/// bad shape surfaces as `InvalidPatternCandidate`.
const PATTERN: Param = Param::Any;

/// The four pattern operations backed by `E`.
pub fn regexp_interpreters<E: Engine>() -> Registry {
    let mut registry = Registry::new();
    registry.register(StringMatch::<E>::new());
    registry.register(StringTest::<E>::new());
    registry.register(StringReplace::<E>::new());
    registry.register(StringSplit::<E>::new());
    registry
}

macro_rules! engine_interpreter {
    ($(#[$doc:meta])* $ty:ident) => {
        $(#[$doc])*
        pub struct $ty<E>(PhantomData<fn() -> E>);

        impl<E: Engine> $ty<E> {
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<E: Engine> Default for $ty<E> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

engine_interpreter! {
    /// `["$stringMatch", pattern, value?]` → array of strings
    StringMatch
}

engine_interpreter! {
    /// `["$stringTest", pattern, value?]` → boolean
    StringTest
}

engine_interpreter! {
    /// `["$stringReplace", pattern, replacement, value?]` → string
    ///
    /// `replacement` is an expression evaluated once per match in a child
    /// scope whose `$$VALUE` is the matched text and whose
    /// `$$PARENT_SCOPE` is the calling scope. It must produce a string.
    StringReplace
}

engine_interpreter! {
    /// `["$stringSplit", pattern, value?]` → array of strings
    StringSplit
}

impl<E: Engine> Interpreter for StringMatch<E> {
    fn name(&self) -> &'static str { "$stringMatch" }
    fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
        let bound = bind_args(ctx, self.name(), &[PATTERN, Param::Typed(STRING)], args)?;
        let pattern = normalize::<E>(&bound[0])?;
        Ok(Value::Array(pattern.match_in(as_str(&bound[1]))?))
    }
}

impl<E: Engine> Interpreter for StringTest<E> {
    fn name(&self) -> &'static str { "$stringTest" }
    fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
        let bound = bind_args(ctx, self.name(), &[PATTERN, Param::Typed(STRING)], args)?;
        let pattern = normalize::<E>(&bound[0])?;
        Ok(Value::Bool(pattern.test(as_str(&bound[1]))?))
    }
}

impl<E: Engine> Interpreter for StringReplace<E> {
    fn name(&self) -> &'static str { "$stringReplace" }
    fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
        let params = [PATTERN, Param::Raw, Param::Typed(STRING)];
        let bound = bind_args(ctx, self.name(), &params, args)?;
        let pattern = normalize::<E>(&bound[0])?;
        let replacement = bound[1].as_ref();

        let replaced = pattern.replace_with(as_str(&bound[2]), |matched| {
            trace!(matched, "evaluating replacement");
            let scope = ctx.scope.child(matched);
            let value = evaluate_typed(ValueType::String, &ctx.with_scope(&scope), replacement)?;
            Ok(as_str(&value).to_string())
        })?;
        Ok(Value::String(replaced))
    }
}

impl<E: Engine> Interpreter for StringSplit<E> {
    fn name(&self) -> &'static str { "$stringSplit" }
    fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
        let bound = bind_args(ctx, self.name(), &[PATTERN, Param::Typed(STRING)], args)?;
        let pattern = normalize::<E>(&bound[0])?;
        Ok(Value::Array(pattern.split(as_str(&bound[1]))?))
    }
}
