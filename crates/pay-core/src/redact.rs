//! # Payload Redaction
//!
//! Strips card data out of request payloads before they reach the API log.
//! Drop-in sends card fields encrypted, but even ciphertext stays out of the log.

use serde_json::{Map, Value};

/// Placeholder written in place of every sensitive value
pub const REDACTED: &str = "[REDACTED]";

/// Field names redacted wherever they appear (compared case-insensitively)
pub const SENSITIVE_KEYS: [&str; 7] = [
    "encryptedCardNumber",
    "encryptedSecurityCode",
    "encryptedExpiryMonth",
    "encryptedExpiryYear",
    "encryptedPassword",
    "cvc",
    "number",
];

/// Returns true if values stored under `key` must not be logged.
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.contains("encrypted") || SENSITIVE_KEYS.iter().any(|k| k.to_lowercase() == lower)
}

/// Return a redacted copy of `value`.
///
/// The output has the same shape as the input. Inside any object, a sensitive
/// key keeps its name but its value becomes [`REDACTED`], whatever it was.
pub fn sanitize(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(sanitize).collect()),
        Value::Object(map) => Value::Object(sanitize_map(map)),
        scalar => scalar.clone(),
    }
}

fn sanitize_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let value = if is_sensitive_key(key) {
                Value::String(REDACTED.to_string())
            } else {
                sanitize(value)
            };
            (key.clone(), value)
        })
        .collect()
}
