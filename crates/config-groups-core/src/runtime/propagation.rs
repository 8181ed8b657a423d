// crates/config-groups-core/src/runtime/propagation.rs
// ============================================================================
// Module: Config Groups Override Propagation
// Description: Restart classification and per-instance propagation reports.
// Purpose: Decide restart requirements and record delivery outcomes.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! Restart classification is computed from the rule table's `dynamic` flags
//! over the keys a change touched, not over the whole group. A key with no
//! rule is treated as non-dynamic.
//!
//! Instance status is sticky: once a delivery requires a restart, later
//! dynamic-only deliveries leave the instance in
//! [`InstanceStatus::RestartRequired`] until it is explicitly restarted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::ConfigurationValues;
use crate::core::GroupId;
use crate::core::InstanceId;
use crate::core::InstanceStatus;
use crate::core::RestartRequirement;
use crate::core::RuleTable;

// ============================================================================
// SECTION: Classification
// ============================================================================

/// Classifies the restart requirement for a set of touched keys.
#[must_use]
pub fn classify_restart<'a, I>(keys: I, rules: &RuleTable) -> RestartRequirement
where
    I: IntoIterator<Item = &'a str>,
{
    let required =
        keys.into_iter().any(|key| rules.get(key).is_none_or(|rule| !rule.dynamic));
    if required { RestartRequirement::Required } else { RestartRequirement::NotRequired }
}

/// Returns the keys a full replacement touches: every new key plus every
/// removed key.
#[must_use]
pub fn replaced_keys(before: &ConfigurationValues, after: &ConfigurationValues) -> BTreeSet<String> {
    before.keys().filter(|key| !after.contains_key(*key)).chain(after.keys()).cloned().collect()
}

/// Returns the status an instance moves to after a successful delivery.
#[must_use]
pub const fn next_status(current: InstanceStatus, restart: RestartRequirement) -> InstanceStatus {
    match (current, restart) {
        (_, RestartRequirement::Required) | (InstanceStatus::RestartRequired, _) => {
            InstanceStatus::RestartRequired
        }
        (InstanceStatus::Active, RestartRequirement::NotRequired) => InstanceStatus::Active,
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Outcome of delivering overrides to one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PropagationOutcome {
    /// Overrides were applied and the status recorded.
    Delivered,
    /// Delivery or status recording failed.
    Failed {
        /// Stable error kind label.
        kind: String,
        /// Error description.
        message: String,
    },
}

/// Propagation result for one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePropagation {
    /// Instance identifier.
    pub instance_id: InstanceId,
    /// Restart classification of the delivered change.
    pub restart: RestartRequirement,
    /// Instance status after the attempt (unchanged on failure).
    pub status: InstanceStatus,
    /// Delivery outcome.
    #[serde(flatten)]
    pub outcome: PropagationOutcome,
}

impl InstancePropagation {
    /// Returns true when the overrides were delivered.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self.outcome, PropagationOutcome::Delivered)
    }
}

/// Propagation results for every instance of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
    /// Group whose overrides were propagated.
    pub group_id: GroupId,
    /// Per-instance results in instance identifier order.
    pub instances: Vec<InstancePropagation>,
}

impl PropagationReport {
    /// Creates an empty report for a group.
    #[must_use]
    pub const fn new(group_id: GroupId) -> Self {
        Self {
            group_id,
            instances: Vec::new(),
        }
    }

    /// Returns true when every instance received the overrides.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.instances.iter().all(InstancePropagation::is_delivered)
    }

    /// Returns the instances whose delivery failed.
    pub fn failures(&self) -> impl Iterator<Item = &InstancePropagation> {
        self.instances.iter().filter(|entry| !entry.is_delivered())
    }

    /// Returns the entry for one instance.
    #[must_use]
    pub fn instance(&self, instance_id: &InstanceId) -> Option<&InstancePropagation> {
        self.instances.iter().find(|entry| &entry.instance_id == instance_id)
    }
}
