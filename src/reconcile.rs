//! Recovering one structured result from the engine's stdout.
//!
//! The engine is expected to print exactly one JSON value, but it may be
//! preceded by informational banners (office startup chatter, deprecation
//! warnings). Reconciliation is an ordered list of strategies, tried in
//! sequence, first success wins; it never fails outright. Unparseable output
//! degrades to a raw-text wrapper so the bridge stays usable even when the
//! engine's output format drifts.

use serde_json::{Value, json};

/// Recovery strategies in priority order. Each returns the recovered value
/// or `None` when it does not apply.
const STRATEGIES: &[fn(&str) -> Option<Value>] = &[parse_whole, parse_object_suffix];

/// Produce exactly one result value from accumulated stdout.
///
/// Exactly one path produces the final value; nothing is attempted after a
/// strategy succeeds. When no strategy applies the result is
/// `{"success": true, "output": <stdout>}` with the original text preserved
/// byte-for-byte.
pub fn reconcile(stdout: &str) -> Value {
    for strategy in STRATEGIES {
        if let Some(value) = strategy(stdout) {
            return value;
        }
    }
    json!({ "success": true, "output": stdout })
}

/// Strategy 1: the entire stdout text is one JSON value.
fn parse_whole(stdout: &str) -> Option<Value> {
    serde_json::from_str(stdout).ok()
}

/// Strategy 2: skip leading non-JSON lines, then parse from the first line
/// that opens an object through the end of the stream. Trailing garbage
/// after the suffix makes the whole strategy inapplicable; a partial
/// extraction is never returned.
fn parse_object_suffix(stdout: &str) -> Option<Value> {
    let lines: Vec<&str> = stdout.split('\n').collect();
    let start = lines
        .iter()
        .position(|line| line.trim_start().starts_with('{'))?;
    serde_json::from_str(&lines[start..].join("\n")).ok()
}
