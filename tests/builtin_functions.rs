use regexp_expressions::{eval_str, Registry, Scope};
use serde_json::json;

#[test]
fn test_builtin_upper_lower() {
    let registry = Registry::with_builtins();
    let scope = Scope::with_value("MiXeD");
    assert_eq!(eval_str(&registry, &scope, r#"["$stringToUpperCase"]"#).unwrap(), json!("MIXED"));
    assert_eq!(eval_str(&registry, &scope, r#"["$stringToLowerCase"]"#).unwrap(), json!("mixed"));
}

#[test]
fn test_builtin_value_default() {
    let registry = Registry::with_builtins();
    let scope = Scope::with_value(json!({"a": null}));
    assert_eq!(
        eval_str(&registry, &scope, r#"["$value", "a", "fallback"]"#).unwrap(),
        json!("fallback")
    );
}

#[test]
fn test_unregistered_head_is_literal() {
    let registry = Registry::with_builtins();
    let scope = Scope::default();
    assert_eq!(
        eval_str(&registry, &scope, r#"["$stringMatch", "a"]"#).unwrap(),
        json!(["$stringMatch", "a"])
    );
}

#[test]
fn test_pattern_ops_compose_with_builtins() {
    let registry = Registry::with_regexp::<regexp_expressions::Linear>();
    let scope = Scope::with_value("a1b22c333");
    let expr = r#"["$stringSplit", "\\d+", ["$stringToUpperCase"]]"#;
    assert_eq!(eval_str(&registry, &scope, expr).unwrap(), json!(["A", "B", "C", ""]));
}
