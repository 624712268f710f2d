//! `"yes"`/`"no"` flag values.
//!
//! Flags are written as `"yes"` or `"no"` in the configuration file; plain
//! TOML booleans are accepted as well.
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize a yes/no string or a boolean into `bool`.
///
/// # Errors
///
/// Returns a deserialization error for any other value.
pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

struct FlagVisitor;

impl Visitor<'_> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"yes\", \"no\" or a boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// Parse a yes/no word, case-insensitively.
#[must_use]
pub fn parse(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}
