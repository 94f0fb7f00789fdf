//! Lenient deserializers for catalog payloads
//!
//! The catalog is not consistent about scalar types: volume numbers and issue
//! names arrive as either JSON numbers or strings, years may be strings, and
//! the recent-article cursor is either a bare link or an object carrying one.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Accepts a string or a number and yields its textual form
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

/// Accepts null, a number, or a numeric string; anything unparsable is `None`
pub fn opt_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Accepts null, a link string, or an object with a `link` field
pub fn opt_link<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(map) => map
            .get("link")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}
