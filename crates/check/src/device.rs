//! Shared helpers for pulling metric values out of device JSON

use anyhow::{Context, Result};
use check_lib::lookup::{lookup, value_to_string};
use serde_json::Value;

/// Value at a dotted path, rendered as a string.
pub fn string_at(data: &Value, path: &str) -> Result<String> {
    lookup(data, path)
        .map(value_to_string)
        .with_context(|| format!("no key {path} in device data"))
}

/// Value at a dotted path, parsed as a number.
pub fn number_at(data: &Value, path: &str) -> Result<f64> {
    let raw = string_at(data, path)?;
    raw.trim()
        .parse()
        .with_context(|| format!("value '{raw}' for key {path} is not numeric"))
}
