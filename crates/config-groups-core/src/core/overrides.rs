// crates/config-groups-core/src/core/overrides.rs
// ============================================================================
// Module: Config Groups Override Delivery
// Description: Override payloads delivered to live instances.
// Purpose: Define the delivery contract between the service and instance control.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`OverrideDelivery`] carries the complete override mapping an instance
//! should run with, together with the restart classification computed for the
//! change that produced it. Deliveries always carry the full mapping, never a
//! delta; an empty mapping clears all overrides.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::values::ConfigurationValues;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Whether applying a change needs an engine restart to take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartRequirement {
    /// All changed parameters are dynamic.
    #[default]
    NotRequired,
    /// At least one changed parameter is non-dynamic or unknown.
    Required,
}

impl RestartRequirement {
    /// Returns true when a restart is required.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::Required)
    }

    /// Returns a stable label for the requirement.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRequired => "not_required",
            Self::Required => "required",
        }
    }
}

/// Override payload delivered to one instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OverrideDelivery {
    /// Complete override mapping the instance should run with.
    pub overrides: ConfigurationValues,
    /// Restart classification for the change.
    pub restart: RestartRequirement,
}

impl OverrideDelivery {
    /// Builds a delivery that clears every override.
    #[must_use]
    pub fn clear() -> Self {
        Self::default()
    }
}
