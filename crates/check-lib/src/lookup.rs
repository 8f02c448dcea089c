//! Dotted-path lookup into decoded JSON
//!
//! Device responses are free-form JSON; metrics are addressed by dotted
//! paths like `wireless.polling.quality` or `wireless.chainrssi.0`,
//! where a segment that parses as an index steps into an array.

use serde_json::Value;

/// Resolve a dotted path inside a JSON value.
///
/// Returns `None` as soon as a segment does not exist or the current
/// value cannot be stepped into.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Render a JSON leaf the way the device web UI shows it.
///
/// Strings come back unquoted; numbers, booleans and null keep their
/// JSON literal form. Containers also fall back to their JSON form,
/// which only matters for error reporting.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Format a computed number, dropping the decimal point when it is whole.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
