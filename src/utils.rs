//! Small helpers shared by the handlers and the CLI.

use serde::Serialize;

/// True when `value` parses as a finite number after trimming.
pub fn is_numeric_string(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(f64::is_finite)
        .unwrap_or(false)
}

/// Pretty JSON with a two-space indent.
pub fn jd<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
