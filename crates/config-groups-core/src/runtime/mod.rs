// crates/config-groups-core/src/runtime/mod.rs
// ============================================================================
// Module: Config Groups Runtime
// Description: Validation, lifecycle service, propagation, and in-memory backends.
// Purpose: Execute configuration group operations against the interfaces.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement validation, the lifecycle service, and override
//! propagation. Every outer surface calls into the same service so behavior
//! does not drift between the CLI and tests.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod control;
pub mod propagation;
pub mod service;
pub mod store;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use control::RecordedDelivery;
pub use control::RecordingInstanceControl;
pub use propagation::InstancePropagation;
pub use propagation::PropagationOutcome;
pub use propagation::PropagationReport;
pub use propagation::classify_restart;
pub use propagation::next_status;
pub use propagation::replaced_keys;
pub use service::ConfigurationError;
pub use service::ConfigurationService;
pub use service::ErrorClass;
pub use service::GroupChanges;
pub use service::GroupUpdate;
pub use service::NewGroup;
pub use store::InMemoryConfigurationStore;
pub use store::SharedConfigurationStore;
pub use validator::ValidationError;
pub use validator::validate;
pub use validator::validate_document;
pub use validator::validate_values;
