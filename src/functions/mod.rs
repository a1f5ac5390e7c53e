use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::Context;
use crate::engine::Engine;
use crate::errors::Result;

pub mod regexp;

/// A named operation callable from an expression `[name, ...args]`.
///
/// `args` are the raw, unevaluated argument expressions; implementations bind
/// them with [`crate::expression::bind_args`].
pub trait Interpreter: Send + Sync {
    fn name(&self) -> &'static str;
    fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value>;
}

/// Thread-safe interpreter registry.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<HashMap<&'static str, Arc<dyn Interpreter>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value and string built-ins, without any pattern operations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(builtins::ValueOf);
        registry.register(builtins::Literal);
        registry.register(builtins::ToUpperCase);
        registry.register(builtins::ToLowerCase);
        registry.register(builtins::Concat);
        registry
    }

    /// Built-ins plus the pattern operations backed by engine `E`.
    pub fn with_regexp<E: Engine>() -> Self {
        let mut registry = Self::with_builtins();
        registry.extend(&regexp::regexp_interpreters::<E>());
        registry
    }

    pub fn register<F: Interpreter + 'static>(&mut self, f: F) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(f.name(), Arc::new(f));
    }

    /// Copy every entry of `other` in, replacing same-named ones.
    pub fn extend(&mut self, other: &Registry) {
        let map = Arc::make_mut(&mut self.inner);
        map.extend(other.inner.iter().map(|(k, v)| (*k, Arc::clone(v))));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Interpreter>> {
        self.inner.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.keys().copied()
    }
}

/// String view of an argument already checked as a string by `bind_args`.
pub(crate) fn as_str(value: &Value) -> &str {
    value.as_str().unwrap_or_default()
}

pub mod builtins {
    use super::*;
    use crate::errors::EvalError;
    use crate::expression::{bind_args, evaluate, Param, ValueType};

    const STRING: &[ValueType] = &[ValueType::String];

    /// `["$value", path?, default?]`
    ///
    /// Not bound through the current-value convention: a missing path
    /// already means "the current value".
    pub struct ValueOf;
    impl Interpreter for ValueOf {
        fn name(&self) -> &'static str { "$value" }
        fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
            if args.len() > 2 {
                return Err(EvalError::Arity {
                    name: self.name().to_string(),
                    expected: "0 to 2".to_string(),
                    found: args.len(),
                });
            }
            let mut evaluated = args.iter().map(|expr| evaluate(ctx, expr));
            let path = evaluated.next().transpose()?.unwrap_or(Value::Null);
            let default = evaluated.next().transpose()?.unwrap_or(Value::Null);

            let resolved = match &path {
                Value::String(path) if !path.is_empty() => ctx.scope.resolve(path),
                Value::String(_) | Value::Null => ctx.scope.value().cloned(),
                other => {
                    return Err(EvalError::Type {
                        expected: "string | null".to_string(),
                        found: ValueType::of(other),
                    })
                }
            };
            Ok(match resolved {
                Some(Value::Null) | None => default,
                Some(value) => value,
            })
        }
    }

    /// `["$literal", value]`: `value` unevaluated.
    ///
    /// Exactly one argument; there is no current-value default.
    pub struct Literal;
    impl Interpreter for Literal {
        fn name(&self) -> &'static str { "$literal" }
        fn call(&self, _ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
            match args {
                [value] => Ok(value.clone()),
                _ => Err(EvalError::Arity {
                    name: self.name().to_string(),
                    expected: "1".to_string(),
                    found: args.len(),
                }),
            }
        }
    }

    pub struct ToUpperCase;
    impl Interpreter for ToUpperCase {
        fn name(&self) -> &'static str { "$stringToUpperCase" }
        fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
            let bound = bind_args(ctx, self.name(), &[Param::Typed(STRING)], args)?;
            Ok(Value::String(as_str(&bound[0]).to_uppercase()))
        }
    }

    pub struct ToLowerCase;
    impl Interpreter for ToLowerCase {
        fn name(&self) -> &'static str { "$stringToLowerCase" }
        fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
            let bound = bind_args(ctx, self.name(), &[Param::Typed(STRING)], args)?;
            Ok(Value::String(as_str(&bound[0]).to_lowercase()))
        }
    }

    /// `["$stringConcat", suffix, value?]` → `value + suffix`
    pub struct Concat;
    impl Interpreter for Concat {
        fn name(&self) -> &'static str { "$stringConcat" }
        fn call(&self, ctx: &Context<'_>, args: &[Value]) -> Result<Value> {
            let params = [Param::Typed(STRING), Param::Typed(STRING)];
            let bound = bind_args(ctx, self.name(), &params, args)?;
            Ok(Value::String(format!("{}{}", as_str(&bound[1]), as_str(&bound[0]))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Scope;
    use crate::expression::evaluate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn eval_in(scope: &Scope<'_>, expr: Value) -> Result<Value> {
        let registry = Registry::with_builtins();
        evaluate(&Context::new(&registry, scope), &expr)
    }

    #[test]
    fn value_reads_current_value_and_paths() {
        let scope = Scope::with_value(json!({"name": "ana"})).bind("$$limit", 3);
        assert_eq!(eval_in(&scope, json!(["$value"])).unwrap(), json!({"name": "ana"}));
        assert_eq!(eval_in(&scope, json!(["$value", "name"])).unwrap(), json!("ana"));
        assert_eq!(eval_in(&scope, json!(["$value", "$$limit"])).unwrap(), json!(3));
        assert_eq!(
            eval_in(&scope, json!(["$value", "missing", "fallback"])).unwrap(),
            json!("fallback")
        );
    }

    #[test]
    fn string_builtins_default_to_current_value() {
        let scope = Scope::with_value("Abc");
        assert_eq!(eval_in(&scope, json!(["$stringToUpperCase"])).unwrap(), json!("ABC"));
        assert_eq!(eval_in(&scope, json!(["$stringToLowerCase"])).unwrap(), json!("abc"));
        assert_eq!(eval_in(&scope, json!(["$stringConcat", "!"])).unwrap(), json!("Abc!"));
        assert_eq!(
            eval_in(&scope, json!(["$stringConcat", "!", "x"])).unwrap(),
            json!("x!")
        );
    }

    #[test]
    fn literal_skips_evaluation() {
        let scope = Scope::with_value("v");
        assert_eq!(
            eval_in(&scope, json!(["$literal", ["$value"]])).unwrap(),
            json!(["$value"])
        );
    }

    #[test]
    fn literal_requires_exactly_one_argument() {
        let scope = Scope::with_value("v");
        for expr in [json!(["$literal"]), json!(["$literal", 1, 2])] {
            assert!(matches!(
                eval_in(&scope, expr),
                Err(crate::errors::EvalError::Arity { ref expected, .. }) if expected == "1"
            ));
        }
    }

    #[test]
    fn value_rejects_non_string_path() {
        let scope = Scope::with_value("v");
        assert!(matches!(
            eval_in(&scope, json!(["$value", 3])),
            Err(crate::errors::EvalError::Type { .. })
        ));
    }

    #[test]
    fn registry_extend_and_lookup() {
        let mut registry = Registry::new();
        assert!(registry.get("$value").is_none());
        registry.extend(&Registry::with_builtins());
        assert!(registry.get("$value").is_some());
        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["$literal", "$stringConcat", "$stringToLowerCase", "$stringToUpperCase", "$value"]
        );
    }
}
