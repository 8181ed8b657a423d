// crates/config-groups-core/src/interfaces/mod.rs
// ============================================================================
// Module: Config Groups Interfaces
// Description: Backend-agnostic interfaces for persistence and instance control.
// Purpose: Define the contract surfaces used by the configuration service.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the configuration service integrates with storage
//! backends and with the agents that apply overrides to running instances,
//! without embedding backend-specific details. Implementations must fail
//! closed on missing or inconsistent data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ConfigurationGroup;
use crate::core::GroupId;
use crate::core::InstanceId;
use crate::core::InstanceRecord;
use crate::core::OverrideDelivery;
use crate::core::TenantId;

// ============================================================================
// SECTION: Configuration Store
// ============================================================================

/// Configuration store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store I/O error.
    #[error("configuration store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("configuration store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("configuration store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("configuration store invalid data: {0}")]
    Invalid(String),
    /// A concurrent writer changed the record first.
    #[error("configuration store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("configuration store error: {0}")]
    Store(String),
}

impl StoreError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "store_io",
            Self::Corrupt(_) => "store_corrupt",
            Self::VersionMismatch(_) => "store_version_mismatch",
            Self::Invalid(_) => "store_invalid",
            Self::Conflict(_) => "store_conflict",
            Self::Store(_) => "store_error",
        }
    }
}

/// Persistence for configuration groups and the instances that use them.
///
/// Loaded groups always carry their derived instance references, sorted by
/// instance identifier. Lookups are tenant-scoped: a record owned by another
/// tenant is reported as absent.
pub trait ConfigurationStore {
    /// Lists the groups owned by a tenant, ordered by group identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    fn list_groups(&self, tenant_id: &TenantId) -> Result<Vec<ConfigurationGroup>, StoreError>;

    /// Loads a group by tenant and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<Option<ConfigurationGroup>, StoreError>;

    /// Saves a group (name, description, and items) and returns its new revision.
    ///
    /// The group's `revision` must equal the stored revision, or zero for a
    /// group that has never been saved. The `instances` field is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the stored revision differs.
    fn save_group(&self, group: &ConfigurationGroup) -> Result<u64, StoreError>;

    /// Deletes a group and its items. Returns false when no such group exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when instances still reference the group.
    fn delete_group(&self, tenant_id: &TenantId, group_id: &GroupId) -> Result<bool, StoreError>;

    /// Loads an instance record by tenant and identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load_instance(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<Option<InstanceRecord>, StoreError>;

    /// Inserts or replaces an instance record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when the record references a group the
    /// tenant does not own.
    fn save_instance(&self, instance: &InstanceRecord) -> Result<(), StoreError>;

    /// Lists the instances owned by a tenant, ordered by instance identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    fn list_instances(&self, tenant_id: &TenantId) -> Result<Vec<InstanceRecord>, StoreError>;

    /// Reports store readiness.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Instance Control
// ============================================================================

/// Instance control errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceControlError {
    /// Instance agent could not be reached.
    #[error("instance {0} unreachable: {1}")]
    Unreachable(InstanceId, String),
    /// Instance agent rejected the overrides.
    #[error("instance {0} rejected overrides: {1}")]
    Rejected(InstanceId, String),
}

impl InstanceControlError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable(..) => "instance_unreachable",
            Self::Rejected(..) => "instance_rejected",
        }
    }
}

/// Applies override mappings to running instances.
pub trait InstanceControl {
    /// Delivers the full override mapping to one instance.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceControlError`] when the instance cannot apply it.
    fn apply_overrides(
        &self,
        instance: &InstanceRecord,
        delivery: &OverrideDelivery,
    ) -> Result<(), InstanceControlError>;
}
