// crates/config-groups-core/src/core/mod.rs
// ============================================================================
// Module: Config Groups Core Types
// Description: Canonical configuration group, rule, and value structures.
// Purpose: Provide stable, serializable types shared by every crate.
// Dependencies: serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! Core types define parameter rules, typed values, configuration groups, and
//! instance records. These types are the source of truth for the stores, the
//! views, and the CLI output.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod group;
pub mod identifiers;
pub mod overrides;
pub mod rules;
pub mod values;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use group::ConfigurationGroup;
pub use group::FlavorSpec;
pub use group::InstanceRecord;
pub use group::InstanceRef;
pub use group::InstanceStatus;
pub use group::MAX_GROUP_DESCRIPTION_LENGTH;
pub use group::MAX_GROUP_NAME_LENGTH;
pub use group::MAX_ITEM_KEY_LENGTH;
pub use group::MAX_ITEM_VALUE_LENGTH;
pub use identifiers::GroupId;
pub use identifiers::InstanceId;
pub use identifiers::TenantId;
pub use overrides::OverrideDelivery;
pub use overrides::RestartRequirement;
pub use rules::MAX_RULES_FILE_BYTES;
pub use rules::ParameterRule;
pub use rules::RuleDocument;
pub use rules::RuleError;
pub use rules::RuleKind;
pub use rules::RuleRecord;
pub use rules::RuleTable;
pub use values::ConfigurationValues;
pub use values::ParameterValue;
pub use values::ProposedValues;
pub use values::ValueKind;
pub use values::to_proposed;
