//! Configuration items and typed value coercion
//!
//! A [`ConfigItem`] is one named entry as held by a persisted store: a raw
//! string value plus a declared [`ValueType`] describing how consumers read
//! it. Resolution produces a [`ConfigValue`].
//!
//! # Coercion asymmetry
//!
//! Only [`ValueType::Integer`] actually converts the raw string. Every other
//! declared type (`boolean`, `select`, `html`, ...) passes the raw value
//! through unchanged; consumers of those types cast on their side, and that
//! contract is kept here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

// =============================================================================
// Value Types
// =============================================================================

/// Declared type of a configuration entry's raw value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Short string value
    #[default]
    String,
    /// Integer value (the only type that triggers coercion)
    Integer,
    /// Multi-line text
    Text,
    /// Sensitive value, masked in admin UIs
    Password,
    /// Raw HTML fragment
    Html,
    /// One of a fixed set of options
    Select,
    /// Boolean flag, stored as its raw string form
    Boolean,
}

// =============================================================================
// Config Item
// =============================================================================

/// One named configuration entry
///
/// `name` is unique across a store. Items flagged `autoload` belong to the
/// snapshot that [`ConfigResolver`](crate::ConfigResolver) bulk-loads and
/// caches; everything else is fetched per lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigItem {
    /// Unique key, typically dotted ("batch.default_method")
    pub name: String,

    /// Raw stored value (string representation regardless of type)
    pub value: String,

    /// Declared type for consumer-side interpretation
    #[serde(rename = "type", default)]
    pub value_type: ValueType,

    /// Whether this entry belongs to the bulk-loaded snapshot
    #[serde(default)]
    pub autoload: bool,

    /// Last modification time, if the store tracks it
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl ConfigItem {
    /// Create a new item with the given name, raw value and declared type
    pub fn new(name: impl Into<String>, value: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            value_type,
            autoload: false,
            updated_at: None,
        }
    }

    /// Flag this item for inclusion in the autoload snapshot
    #[must_use]
    pub fn autoloaded(mut self) -> Self {
        self.autoload = true;
        self
    }

    /// Stamp the item with the current time
    #[must_use]
    pub fn touched(mut self) -> Self {
        self.updated_at = Some(OffsetDateTime::now_utc());
        self
    }
}

// =============================================================================
// Resolved Values
// =============================================================================

/// A resolved, typed configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// Raw string passthrough (every declared type except `integer`)
    String(String),
    /// Parsed integer
    Integer(i64),
}

impl ConfigValue {
    /// Get the value as a string slice, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            ConfigValue::Integer(_) => None,
        }
    }

    /// Get the value as an integer, if it is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(n) => Some(*n),
            ConfigValue::String(_) => None,
        }
    }

    /// Consume the value, rendering integers in decimal
    pub fn into_string(self) -> String {
        match self {
            ConfigValue::String(s) => s,
            ConfigValue::Integer(n) => n.to_string(),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

/// Coerce a raw string per the declared type
///
/// `name` is carried for error reporting only.
///
/// # Errors
///
/// Returns [`Error::InvalidInteger`] when `value_type` is
/// [`ValueType::Integer`] and `raw` does not parse as `i64`.
pub fn coerce(name: &str, raw: &str, value_type: ValueType) -> Result<ConfigValue> {
    match value_type {
        ValueType::Integer => raw
            .parse::<i64>()
            .map(ConfigValue::Integer)
            .map_err(|source| Error::InvalidInteger {
                name: name.to_string(),
                raw: raw.to_string(),
                source,
            }),
        _ => Ok(ConfigValue::String(raw.to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion() {
        let value = coerce("batch.retry_count", "3", ValueType::Integer).unwrap();
        assert_eq!(value, ConfigValue::Integer(3));
        assert_eq!(value.as_int(), Some(3));
        assert_eq!(value.as_str(), None);
    }

    #[test]
    fn test_negative_integer_coercion() {
        let value = coerce("batch.offset", "-7", ValueType::Integer).unwrap();
        assert_eq!(value, ConfigValue::Integer(-7));
    }

    #[test]
    fn test_invalid_integer_rejected() {
        let result = coerce("batch.retry_count", "three", ValueType::Integer);
        let err = result.unwrap_err();
        assert!(matches!(err, Error::InvalidInteger { .. }));
        assert!(err.to_string().contains("batch.retry_count"));
        assert!(err.to_string().contains("three"));
    }

    #[test]
    fn test_non_integer_types_pass_through() {
        for ty in [
            ValueType::String,
            ValueType::Text,
            ValueType::Password,
            ValueType::Html,
            ValueType::Select,
            ValueType::Boolean,
        ] {
            let value = coerce("some.key", "1", ty).unwrap();
            assert_eq!(value, ConfigValue::String("1".into()));
        }
    }

    #[test]
    fn test_value_display() {
        assert_eq!(ConfigValue::String("random".into()).to_string(), "random");
        assert_eq!(ConfigValue::Integer(42).to_string(), "42");
        assert_eq!(ConfigValue::Integer(42).into_string(), "42");
    }

    #[test]
    fn test_item_serde_roundtrip() {
        let item = ConfigItem::new("batch.default_method", "random", ValueType::Select)
            .autoloaded()
            .touched();

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"select\""));

        let loaded: ConfigItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, loaded);
    }

    #[test]
    fn test_item_defaults_on_deserialize() {
        // Minimal stored form: type defaults to string, autoload to false
        let loaded: ConfigItem =
            serde_json::from_str(r#"{"name": "a", "value": "b"}"#).unwrap();
        assert_eq!(loaded.value_type, ValueType::String);
        assert!(!loaded.autoload);
        assert!(loaded.updated_at.is_none());
    }
}
