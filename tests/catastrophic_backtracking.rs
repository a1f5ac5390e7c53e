use std::time::{Duration, Instant};

use regexp_expressions::{eval, Linear};
use serde_json::{json, Value};

// Near-match for ^(\d+)*$: a backtracking engine explores every way of
// partitioning the digits before failing on the trailing "z".
const INPUT: &str = "012345678901234567890123456789z";
const LIMIT: Duration = Duration::from_millis(100);

fn timed(expr: Value) -> Value {
    let start = Instant::now();
    let out = eval::<Linear>(INPUT, &expr).unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed < LIMIT, "took {elapsed:?}");
    out
}

#[test]
fn match_completes_quickly() {
    assert_eq!(timed(json!(["$stringMatch", "^(\\d+)*$"])), json!([]));
}

#[test]
fn test_completes_quickly() {
    assert_eq!(timed(json!(["$stringTest", "^(\\d+)*$"])), json!(false));
}

#[test]
fn replace_completes_quickly() {
    assert_eq!(
        timed(json!(["$stringReplace", "^(\\d+)*$", "<<< REPLACEMENT >>>"])),
        json!(INPUT)
    );
}

#[test]
fn split_completes_quickly() {
    assert_eq!(timed(json!(["$stringSplit", "^(\\d+)*$"])), json!([INPUT]));
}
