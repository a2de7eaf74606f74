//! Tolerant decoding of persisted status flags
//!
//! Flags have been written as native booleans, 0/1 integers and "yes"/"no"
//! strings over time. Anything that is not clearly true decodes as false.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a textual flag: "1", "true" and "yes" (any case, trimmed) are true
pub fn decode_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

/// Decode an optional column value; NULL is false
pub fn decode_optional_flag(raw: Option<&str>) -> bool {
    raw.map(decode_flag).unwrap_or(false)
}

/// Decode a JSON flag: bool, number 1, or a string accepted by [`decode_flag`]
pub fn decode_json_flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64() == Some(1) || n.as_f64() == Some(1.0),
        Value::String(s) => decode_flag(s),
        _ => false,
    }
}

/// serde `deserialize_with` adapter for payload flag fields
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_json_flag(&value))
}
