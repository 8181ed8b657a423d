// crates/config-groups-core/src/core/values.rs
// ============================================================================
// Module: Config Groups Parameter Values
// Description: Typed engine parameter values and value kinds.
// Purpose: Represent accepted override values as a closed tagged union.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Proposed values arrive as raw JSON and are only converted into
//! [`ParameterValue`] after they pass validation against a parameter rule.
//! Accepted values serialize back to plain JSON scalars.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Raw key/value overrides submitted by a caller, prior to validation.
pub type ProposedValues = BTreeMap<String, Value>;

/// Validated key/value overrides, keyed by parameter name.
pub type ConfigurationValues = BTreeMap<String, ParameterValue>;

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Boolean values.
    Boolean,
    /// Whole-number values.
    Integer,
    /// String values.
    String,
}

impl ValueKind {
    /// Returns the type tag used in rule documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::String => "string",
        }
    }

    /// Parses a rule document type tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepted parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// String value.
    String(String),
}

impl ParameterValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::String(_) => ValueKind::String,
        }
    }

    /// Returns the value as a JSON scalar.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Boolean(value) => Value::Bool(*value),
            Self::Integer(value) => Value::from(*value),
            Self::String(value) => Value::String(value.clone()),
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => value.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::String(value) => value.fmt(f),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Converts validated values back into their raw JSON form.
#[must_use]
pub fn to_proposed(values: &ConfigurationValues) -> ProposedValues {
    values.iter().map(|(key, value)| (key.clone(), value.to_json())).collect()
}
