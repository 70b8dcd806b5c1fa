//! Permissive deserializers for loosely typed request payloads.
//!
//! Clients send whatever their storefront happens to hold, so malformed optional
//! fields are normalized to a safe default instead of failing the whole request.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::CatalogItem;

/// Strings pass through, numbers are rendered as strings, everything else is absent.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value))
}

/// Identifiers must be JSON strings. Anything else is absent, so a numeric id
/// can never collide with a string id that renders the same.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_id(value))
}

/// Catalog entries that are not JSON objects are skipped; a non-array catalog is empty.
pub fn catalog<'de, D>(deserializer: D) -> Result<Vec<CatalogItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };

    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

/// A list of identifiers. Non-string entries are dropped; a non-array value is empty.
pub fn id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(entries) = value else {
        return Ok(Vec::new());
    };

    Ok(entries.into_iter().filter_map(value_to_id).collect())
}

/// Result size requested by the caller.
///
/// Falsy values (`null`, `false`, `0`, `""`, empty containers) and values that
/// cannot be read as an integer yield `None` so the caller falls back to its default.
/// Non-zero numbers are truncated toward zero, which can still produce `Some(0)`.
pub fn top_k<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_k(&value))
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn value_to_id(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn value_to_k(value: &Value) -> Option<i64> {
    match value {
        Value::Bool(true) => Some(1),
        Value::Number(n) => {
            if let Some(k) = n.as_i64() {
                (k != 0).then_some(k)
            } else {
                let f = n.as_f64()?;
                (f != 0.0).then(|| f.trunc() as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
