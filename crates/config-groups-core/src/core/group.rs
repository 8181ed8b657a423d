// crates/config-groups-core/src/core/group.rs
// ============================================================================
// Module: Config Groups Model
// Description: Configuration groups, instance records, and their association.
// Purpose: Provide the persisted shapes shared by the service and stores.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ConfigurationGroup`] is a tenant-owned bundle of validated parameter
//! overrides. Instances reference at most one group; the reverse set of
//! instance references is derived by the store when a group is loaded and is
//! never written through [`ConfigurationGroup`] itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::GroupId;
use crate::core::identifiers::InstanceId;
use crate::core::identifiers::TenantId;
use crate::core::values::ConfigurationValues;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum group name length in characters.
pub const MAX_GROUP_NAME_LENGTH: usize = 64;
/// Maximum group description length in characters.
pub const MAX_GROUP_DESCRIPTION_LENGTH: usize = 256;
/// Maximum parameter key length in characters.
pub const MAX_ITEM_KEY_LENGTH: usize = 128;
/// Maximum string parameter value length in characters.
pub const MAX_ITEM_VALUE_LENGTH: usize = 128;

// ============================================================================
// SECTION: Groups
// ============================================================================

/// Instance reference attached to a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceRef {
    /// Instance identifier.
    pub id: InstanceId,
    /// Instance display name.
    pub name: String,
}

/// Named, tenant-owned bundle of parameter overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationGroup {
    /// Group identifier.
    pub id: GroupId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Parameter overrides keyed by name.
    pub items: ConfigurationValues,
    /// Instances currently using this group (derived by the store).
    pub instances: Vec<InstanceRef>,
    /// Store revision; zero until the group is first saved.
    pub revision: u64,
}

impl ConfigurationGroup {
    /// Returns true when at least one instance uses the group.
    #[must_use]
    pub fn is_in_use(&self) -> bool {
        !self.instances.is_empty()
    }
}

// ============================================================================
// SECTION: Instances
// ============================================================================

/// Compute flavor attributes exposed to configuration templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorSpec {
    /// Flavor identifier.
    pub id: String,
    /// Flavor display name.
    pub name: String,
    /// Memory in megabytes.
    pub ram: u64,
    /// Virtual CPU count.
    pub vcpus: u32,
    /// Root disk size in gigabytes.
    #[serde(default)]
    pub disk: u64,
}

/// Serving status tracked for configuration purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceStatus {
    /// Serving with all delivered overrides in effect.
    #[default]
    Active,
    /// A non-dynamic override was delivered; a restart is pending.
    RestartRequired,
}

impl InstanceStatus {
    /// Returns a stable label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::RestartRequired => "RESTART_REQUIRED",
        }
    }
}

/// Database instance as seen by the configuration feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    /// Instance identifier.
    pub id: InstanceId,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Display name.
    pub name: String,
    /// Database engine type (e.g. `mysql`).
    pub service_type: String,
    /// Compute flavor.
    pub flavor: FlavorSpec,
    /// Assigned configuration group, if any.
    pub configuration_id: Option<GroupId>,
    /// Serving status.
    #[serde(default)]
    pub status: InstanceStatus,
}

impl InstanceRecord {
    /// Returns the reference form used in group views.
    #[must_use]
    pub fn reference(&self) -> InstanceRef {
        InstanceRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}
