//! Field access on loosely-typed log entries
//!
//! Every service logs its own shape, so all lookups are optional and never fail.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::time::parse_time;

/// True only when `name` is present and is the JSON literal `true`
pub fn flag(entry: &Value, name: &str) -> bool {
    entry.get(name).and_then(Value::as_bool).unwrap_or(false)
}

pub fn str_field<'a>(entry: &'a Value, name: &str) -> Option<&'a str> {
    entry.get(name).and_then(Value::as_str)
}

/// Render an identifier that may be logged as a string or a number
pub fn value_to_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral floats render without a fraction, so `5.0` and `5` name the same task
fn number_key(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
            (f as i64).to_string()
        }
        _ => n.to_string(),
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Composite `gid::taskid` key identifying one task instance.
///
/// Missing halves render as empty, so entries without either field share the key `::`.
pub fn task_key(entry: &Value) -> String {
    let gid = entry.get("gid").and_then(value_to_key);
    let taskid = entry.get("taskid").and_then(value_to_key);
    format!(
        "{}::{}",
        gid.unwrap_or_default(),
        taskid.unwrap_or_default()
    )
}

/// Timestamp of an entry: an ISO-like `time` string, or epoch milliseconds
pub fn entry_time(entry: &Value) -> Option<DateTime<Utc>> {
    match entry.get("time")? {
        Value::String(s) => parse_time(s),
        Value::Number(n) => DateTime::<Utc>::from_timestamp_millis(n.as_i64()?),
        _ => None,
    }
}
