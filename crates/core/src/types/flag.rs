//! Lenient boolean flags.
//!
//! The ticket API reports `isAdmin` as a JSON boolean, but older records
//! carry the string form (`"true"` / `"false"`). Missing and `null` values
//! read as `false`.

use serde::{Deserialize, Deserializer};

/// Deserialize a flag from a JSON boolean, a `"true"`/`"false"` string, or null.
///
/// Use with `#[serde(default, deserialize_with = "flag::deserialize")]`.
///
/// # Errors
///
/// Returns a deserialization error for any other JSON value.
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Raw::Bool(b)) => Ok(b),
        Some(Raw::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid boolean flag: {other}"
            ))),
        },
    }
}
