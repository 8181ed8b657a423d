// crates/config-groups-core/src/core/rules.rs
// ============================================================================
// Module: Config Groups Parameter Rules
// Description: Operator-defined parameter rules and the immutable rule table.
// Purpose: Parse rule documents once into a closed, typed rule model.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Rule documents list every engine parameter an operator permits in a
//! configuration group, with its type, integer bounds, and whether the engine
//! can apply it without a restart. Type tags and bounds are parsed when the
//! table is built, so a malformed document is rejected before any value is
//! validated against it.
//!
//! A [`RuleTable`] is an explicit value: callers construct it once and pass it
//! by reference to the validator and service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::values::ValueKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum rule document size in bytes.
pub const MAX_RULES_FILE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rule table loading errors.
///
/// All variants describe a deployment misconfiguration rather than a bad
/// client request.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Rule document could not be read.
    #[error("rule document io error: {0}")]
    Io(String),
    /// Rule document is not valid JSON or has the wrong shape.
    #[error("rule document parse error: {0}")]
    Parse(String),
    /// A rule record is malformed.
    #[error("invalid rule definition for {name}: {reason}")]
    InvalidDefinition {
        /// Rule name (may be empty when the name itself is invalid).
        name: String,
        /// Failure description.
        reason: String,
    },
}

// ============================================================================
// SECTION: Rule Model
// ============================================================================

/// Parsed rule kind with integer bounds inlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Boolean parameter.
    Boolean,
    /// String parameter.
    String,
    /// Integer parameter with inclusive bounds.
    Integer {
        /// Minimum accepted value.
        min: i64,
        /// Maximum accepted value.
        max: i64,
    },
}

impl RuleKind {
    /// Returns the value kind accepted by this rule.
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Boolean => ValueKind::Boolean,
            Self::String => ValueKind::String,
            Self::Integer {
                ..
            } => ValueKind::Integer,
        }
    }
}

/// Operator-defined rule for one engine parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterRule {
    /// Parameter name.
    pub name: String,
    /// Accepted kind and bounds.
    pub kind: RuleKind,
    /// True when the engine applies changes without a restart.
    pub dynamic: bool,
}

impl ParameterRule {
    /// Returns the rule in its document form.
    #[must_use]
    pub fn to_record(&self) -> RuleRecord {
        let (min, max) = match self.kind {
            RuleKind::Integer {
                min,
                max,
            } => (Some(Value::String(min.to_string())), Some(Value::String(max.to_string()))),
            RuleKind::Boolean | RuleKind::String => (None, None),
        };
        RuleRecord {
            name: self.name.clone(),
            value_type: self.kind.value_kind().as_str().to_string(),
            dynamic: self.dynamic,
            min,
            max,
        }
    }
}

/// Rule record as it appears in a rule document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    /// Parameter name.
    pub name: String,
    /// Type tag (`boolean`, `string`, `integer`).
    #[serde(rename = "type")]
    pub value_type: String,
    /// Dynamic flag.
    pub dynamic: bool,
    /// Minimum bound (integer rules only, string-encoded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Maximum bound (integer rules only, string-encoded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
}

impl RuleRecord {
    /// Parses the record into a typed rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidDefinition`] for unknown type tags and
    /// missing or unparsable integer bounds.
    pub fn parse(&self) -> Result<ParameterRule, RuleError> {
        if self.name.trim().is_empty() {
            return Err(invalid(&self.name, "rule name must be non-empty"));
        }
        let Some(value_kind) = ValueKind::from_tag(&self.value_type) else {
            return Err(invalid(
                &self.name,
                &format!("unsupported type {}", self.value_type),
            ));
        };
        let kind = match value_kind {
            ValueKind::Boolean => RuleKind::Boolean,
            ValueKind::String => RuleKind::String,
            ValueKind::Integer => {
                let min = parse_bound(&self.name, "min", self.min.as_ref())?;
                let max = parse_bound(&self.name, "max", self.max.as_ref())?;
                if min > max {
                    return Err(invalid(&self.name, "min must not exceed max"));
                }
                RuleKind::Integer {
                    min,
                    max,
                }
            }
        };
        Ok(ParameterRule {
            name: self.name.clone(),
            kind,
            dynamic: self.dynamic,
        })
    }
}

/// Rule document wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Rule records in declaration order.
    #[serde(rename = "configuration-parameters")]
    pub parameters: Vec<RuleRecord>,
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Immutable, ordered set of parameter rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    /// Rules in declaration order.
    rules: Vec<ParameterRule>,
    /// Index from name to the first rule with that name.
    index: BTreeMap<String, usize>,
}

impl RuleTable {
    /// Builds a rule table from already-parsed rules.
    ///
    /// When names repeat, lookups resolve to the first declaration.
    #[must_use]
    pub fn new(rules: Vec<ParameterRule>) -> Self {
        let mut index = BTreeMap::new();
        for (position, rule) in rules.iter().enumerate() {
            index.entry(rule.name.clone()).or_insert(position);
        }
        Self {
            rules,
            index,
        }
    }

    /// Builds a rule table from document records.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidDefinition`] when any record is malformed.
    pub fn from_records(records: &[RuleRecord]) -> Result<Self, RuleError> {
        let rules = records.iter().map(RuleRecord::parse).collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Parses a JSON rule document.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the document is malformed.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, RuleError> {
        if bytes.len() > MAX_RULES_FILE_BYTES {
            return Err(RuleError::Parse(format!(
                "rule document exceeds size limit: {} bytes (max {MAX_RULES_FILE_BYTES})",
                bytes.len()
            )));
        }
        let document: RuleDocument =
            serde_json::from_slice(bytes).map_err(|err| RuleError::Parse(err.to_string()))?;
        Self::from_records(&document.parameters)
    }

    /// Parses a JSON rule document from a string.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the document is malformed.
    pub fn from_json_str(document: &str) -> Result<Self, RuleError> {
        Self::from_json_slice(document.as_bytes())
    }

    /// Loads a JSON rule document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] when the file cannot be read or is malformed.
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let bytes = fs::read(path).map_err(|err| RuleError::Io(err.to_string()))?;
        Self::from_json_slice(&bytes)
    }

    /// Looks up the rule for a parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterRule> {
        self.index.get(name).and_then(|position| self.rules.get(*position))
    }

    /// Returns all rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[ParameterRule] {
        &self.rules
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the table in its document form.
    #[must_use]
    pub fn to_document(&self) -> RuleDocument {
        RuleDocument {
            parameters: self.rules.iter().map(ParameterRule::to_record).collect(),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an invalid-definition error.
fn invalid(name: &str, reason: &str) -> RuleError {
    RuleError::InvalidDefinition {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses an integer bound that may be string- or number-encoded.
fn parse_bound(name: &str, label: &str, value: Option<&Value>) -> Result<i64, RuleError> {
    let parsed = match value {
        None => return Err(invalid(name, &format!("integer rule requires {label}"))),
        Some(Value::String(raw)) => raw.trim().parse::<i64>().ok(),
        Some(Value::Number(number)) => number.as_i64(),
        Some(_) => None,
    };
    parsed.ok_or_else(|| invalid(name, &format!("{label} must be an integer")))
}
