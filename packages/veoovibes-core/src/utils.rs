//! General utilities shared across the crate.
//!
//! The controller is loosely typed: booleans arrive as `"1"`, `"yes"` or
//! `true`, volumes as `57` or `"57"`. The parsers here never fail; input they
//! do not recognise is reported as unknown (`None`), never as `false` or `0`.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Time Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the current Unix timestamp in milliseconds.
///
/// Returns 0 if the system clock is before the Unix epoch (shouldn't happen in practice).
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Loose Value Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parses a boolean-ish value.
///
/// - `true`/`false` JSON booleans map directly
/// - numbers: non-zero is `true`
/// - strings (case-insensitive, trimmed): `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`
///
/// Everything else (including `null`, blank strings, objects) is unknown.
#[must_use]
pub fn parse_truthy(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Parses a numeric-or-string value as a float.
///
/// Returns `None` for non-finite numbers and anything that does not parse.
#[must_use]
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Renders a scalar JSON value as text.
///
/// Room ids are matched as strings regardless of whether the controller sent
/// `3` or `"3"`.
#[must_use]
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns the trimmed text if it contains anything besides whitespace.
#[must_use]
pub fn clean_text(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|s| !s.is_empty())
}
