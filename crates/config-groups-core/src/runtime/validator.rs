// crates/config-groups-core/src/runtime/validator.rs
// ============================================================================
// Module: Config Groups Validator
// Description: Batch validation of proposed parameter overrides.
// Purpose: Accept or reject a whole override batch against the rule table.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Validation walks the proposed values in key order and stops at the first
//! violation, so the reported error is deterministic for a given batch. The
//! batch is either accepted whole or rejected whole; nothing is converted or
//! returned for a rejected batch.
//!
//! Type checks follow the rule's declared kind only. A numeric-looking string
//! never satisfies an integer rule and a float never satisfies one either,
//! even when it has no fractional part.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::ConfigurationValues;
use crate::core::MAX_ITEM_VALUE_LENGTH;
use crate::core::ParameterRule;
use crate::core::ParameterValue;
use crate::core::ProposedValues;
use crate::core::RuleDocument;
use crate::core::RuleError;
use crate::core::RuleKind;
use crate::core::RuleTable;
use crate::core::ValueKind;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a proposed override batch is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No rule exists for the key.
    #[error("unknown configuration parameter: {0}")]
    UnknownParameter(String),
    /// Value kind does not match the rule's declared kind.
    #[error("parameter {key} must be of type {expected}")]
    TypeMismatch {
        /// Parameter name.
        key: String,
        /// Kind the rule declares.
        expected: ValueKind,
    },
    /// Integer value is below the rule minimum.
    #[error("parameter {key} must be at least {min}")]
    BelowMinimum {
        /// Parameter name.
        key: String,
        /// Inclusive minimum.
        min: i64,
    },
    /// Integer value is above the rule maximum.
    #[error("parameter {key} must be at most {max}")]
    AboveMaximum {
        /// Parameter name.
        key: String,
        /// Inclusive maximum.
        max: i64,
    },
    /// String value exceeds the persisted value length.
    #[error("parameter {key} value exceeds {max_length} characters")]
    ValueTooLong {
        /// Parameter name.
        key: String,
        /// Maximum accepted length.
        max_length: usize,
    },
    /// Rule table is malformed.
    #[error("invalid rule definition for {name}: {reason}")]
    InvalidRuleDefinition {
        /// Rule name.
        name: String,
        /// Failure description.
        reason: String,
    },
}

impl ValidationError {
    /// Returns true when the error describes a bad request rather than a
    /// deployment misconfiguration.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::InvalidRuleDefinition { .. })
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownParameter(_) => "unknown_parameter",
            Self::TypeMismatch {
                ..
            } => "type_mismatch",
            Self::BelowMinimum {
                ..
            } => "below_minimum",
            Self::AboveMaximum {
                ..
            } => "above_maximum",
            Self::ValueTooLong {
                ..
            } => "value_too_long",
            Self::InvalidRuleDefinition {
                ..
            } => "invalid_rule_definition",
        }
    }

    /// Returns the offending parameter name.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::UnknownParameter(key)
            | Self::TypeMismatch {
                key, ..
            }
            | Self::BelowMinimum {
                key, ..
            }
            | Self::AboveMaximum {
                key, ..
            }
            | Self::ValueTooLong {
                key, ..
            } => key,
            Self::InvalidRuleDefinition {
                name, ..
            } => name,
        }
    }
}

impl From<RuleError> for ValidationError {
    fn from(error: RuleError) -> Self {
        match error {
            RuleError::InvalidDefinition {
                name,
                reason,
            } => Self::InvalidRuleDefinition {
                name,
                reason,
            },
            RuleError::Io(reason) | RuleError::Parse(reason) => Self::InvalidRuleDefinition {
                name: String::new(),
                reason,
            },
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a batch of proposed overrides.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found in key order.
pub fn validate(values: &ProposedValues, rules: &RuleTable) -> Result<(), ValidationError> {
    for (key, value) in values {
        check_value(key, value, rules)?;
    }
    Ok(())
}

/// Validates a batch and converts it into typed values.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found in key order.
pub fn validate_values(
    values: &ProposedValues,
    rules: &RuleTable,
) -> Result<ConfigurationValues, ValidationError> {
    let mut accepted = ConfigurationValues::new();
    for (key, value) in values {
        accepted.insert(key.clone(), check_value(key, value, rules)?);
    }
    Ok(accepted)
}

/// Validates a batch against an unparsed rule document.
///
/// Malformed rules surface as [`ValidationError::InvalidRuleDefinition`]
/// before any value is checked.
///
/// # Errors
///
/// Returns [`ValidationError`] when the rules or the values are invalid.
pub fn validate_document(
    values: &ProposedValues,
    document: &RuleDocument,
) -> Result<(), ValidationError> {
    let rules = RuleTable::from_records(&document.parameters)?;
    validate(values, &rules)
}

/// Checks one pair and returns its typed form.
fn check_value(
    key: &str,
    value: &Value,
    rules: &RuleTable,
) -> Result<ParameterValue, ValidationError> {
    let Some(rule) = rules.get(key) else {
        return Err(ValidationError::UnknownParameter(key.to_string()));
    };
    match (rule.kind, value) {
        (RuleKind::Boolean, Value::Bool(flag)) => Ok(ParameterValue::Boolean(*flag)),
        (RuleKind::String, Value::String(text)) => {
            if text.chars().count() > MAX_ITEM_VALUE_LENGTH {
                return Err(ValidationError::ValueTooLong {
                    key: key.to_string(),
                    max_length: MAX_ITEM_VALUE_LENGTH,
                });
            }
            Ok(ParameterValue::String(text.clone()))
        }
        (
            RuleKind::Integer {
                min,
                max,
            },
            Value::Number(number),
        ) => {
            let Some(parsed) = number.as_i64() else {
                // Whole numbers past i64::MAX are still integers, just too large.
                if number.is_u64() {
                    return Err(ValidationError::AboveMaximum {
                        key: key.to_string(),
                        max,
                    });
                }
                return Err(mismatch(key, rule));
            };
            if parsed < min {
                return Err(ValidationError::BelowMinimum {
                    key: key.to_string(),
                    min,
                });
            }
            if parsed > max {
                return Err(ValidationError::AboveMaximum {
                    key: key.to_string(),
                    max,
                });
            }
            Ok(ParameterValue::Integer(parsed))
        }
        _ => Err(mismatch(key, rule)),
    }
}

/// Builds a type-mismatch error for a rule.
fn mismatch(key: &str, rule: &ParameterRule) -> ValidationError {
    ValidationError::TypeMismatch {
        key: key.to_string(),
        expected: rule.kind.value_kind(),
    }
}
