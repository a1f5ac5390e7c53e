use serde_json::{Map, Value};

use crate::functions::Registry;

/// Binding holding the value an expression operates on by default.
pub const VALUE: &str = "$$VALUE";
/// Reserved name under which a child scope exposes its parent.
pub const PARENT_SCOPE: &str = "$$PARENT_SCOPE";

/// Variable bindings visible to an expression.
///
/// A child scope never copies or mutates its parent; it keeps a borrow and
/// only reaches it through an explicit `$$PARENT_SCOPE` path segment.
#[derive(Debug, Clone, Default)]
pub struct Scope<'p> {
    bindings: Map<String, Value>,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    pub fn new(bindings: Map<String, Value>) -> Self {
        Self { bindings, parent: None }
    }

    /// Root scope whose only binding is the current value.
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self::default().bind(VALUE, value)
    }

    /// Child scope with `value` as its current value.
    pub fn child(&self, value: impl Into<Value>) -> Scope<'_> {
        let mut bindings = Map::new();
        bindings.insert(VALUE.to_string(), value.into());
        Scope {
            bindings,
            parent: Some(self),
        }
    }

    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn value(&self) -> Option<&Value> {
        self.get(VALUE)
    }

    pub fn parent(&self) -> Option<&'p Scope<'p>> {
        self.parent
    }

    /// Resolve a dotted path.
    ///
    /// Leading `$$PARENT_SCOPE` segments walk up the scope chain. A first
    /// remaining segment starting with `$$` names a scope binding; any other
    /// path is read relative to the current value. Later segments index into
    /// objects (by key) and arrays (by position).
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let mut scope = self;
        let mut segments = path.split('.').peekable();
        while segments.next_if_eq(&PARENT_SCOPE).is_some() {
            scope = scope.parent()?;
        }

        let root = match segments.peek().copied() {
            None => return Some(scope.to_value()),
            Some(name) if name.starts_with("$$") => {
                segments.next();
                scope.get(name)?
            }
            Some(_) => scope.value()?,
        };

        segments
            .try_fold(root, |value, segment| match value {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
            .cloned()
    }

    /// Render the scope chain as a JSON object.
    pub fn to_value(&self) -> Value {
        let mut map = self.bindings.clone();
        if let Some(parent) = self.parent {
            map.insert(PARENT_SCOPE.to_string(), parent.to_value());
        }
        Value::Object(map)
    }
}

/// What every interpreter sees: the registry to dispatch nested expressions
/// through and the scope they are evaluated in.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub interpreters: &'a Registry,
    pub scope: &'a Scope<'a>,
}

impl<'a> Context<'a> {
    pub fn new(interpreters: &'a Registry, scope: &'a Scope<'a>) -> Self {
        Self { interpreters, scope }
    }

    /// Same interpreters, different scope.
    pub fn with_scope<'b>(&self, scope: &'b Scope<'b>) -> Context<'b>
    where
        'a: 'b,
    {
        Context {
            interpreters: self.interpreters,
            scope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn child_scope_reaches_parent_explicitly() {
        let root = Scope::with_value("outer").bind("$$suffix", "!");
        let child = root.child("inner");

        assert_eq!(child.value(), Some(&json!("inner")));
        assert_eq!(child.resolve("$$suffix"), None);
        assert_eq!(child.resolve("$$PARENT_SCOPE.$$suffix"), Some(json!("!")));
        assert_eq!(child.resolve("$$PARENT_SCOPE.$$VALUE"), Some(json!("outer")));
        assert_eq!(root.get("$$VALUE"), Some(&json!("outer")));
        assert!(root.parent().is_none());
        assert_eq!(child.parent().and_then(|p| p.value()), Some(&json!("outer")));
    }

    #[test]
    fn resolve_walks_into_current_value() {
        let scope = Scope::with_value(json!({"user": {"tags": ["a", "b"]}}));
        assert_eq!(scope.resolve("user.tags.1"), Some(json!("b")));
        assert_eq!(scope.resolve("user.missing"), None);
        assert_eq!(scope.resolve("$$VALUE.user.tags.0"), Some(json!("a")));
    }

    #[test]
    fn resolve_parent_scope_renders_object() {
        let root = Scope::with_value("x").bind("$$n", 1);
        let child = root.child("y");
        assert_eq!(
            child.resolve("$$PARENT_SCOPE"),
            Some(json!({"$$VALUE": "x", "$$n": 1}))
        );
        assert_eq!(root.resolve("$$PARENT_SCOPE"), None);
    }
}
