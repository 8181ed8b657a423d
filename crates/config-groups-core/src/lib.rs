// crates/config-groups-core/src/lib.rs
// ============================================================================
// Module: Config Groups Core Library
// Description: Public API surface for the configuration groups core.
// Purpose: Expose core types, interfaces, runtime, views, and audit sinks.
// Dependencies: crate::{audit, core, interfaces, runtime, views}
// ============================================================================

//! ## Overview
//! Configuration groups are named, tenant-owned bundles of database engine
//! parameter overrides. This crate validates overrides against an injected
//! rule table, manages the group lifecycle through a backend-agnostic store
//! interface, and pushes overrides to running instances with restart
//! classification. Storage and instance control plug in through
//! [`ConfigurationStore`] and [`InstanceControl`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;
pub mod views;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::AuditOperation;
pub use audit::AuditOutcome;
pub use audit::ConfigurationAuditEvent;
pub use audit::ConfigurationAuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PropagationAuditEvent;
pub use audit::StderrAuditSink;
pub use interfaces::ConfigurationStore;
pub use interfaces::InstanceControl;
pub use interfaces::InstanceControlError;
pub use interfaces::StoreError;
pub use runtime::ConfigurationError;
pub use runtime::ConfigurationService;
pub use runtime::ErrorClass;
pub use runtime::GroupChanges;
pub use runtime::GroupUpdate;
pub use runtime::InMemoryConfigurationStore;
pub use runtime::InstancePropagation;
pub use runtime::NewGroup;
pub use runtime::PropagationOutcome;
pub use runtime::PropagationReport;
pub use runtime::RecordingInstanceControl;
pub use runtime::SharedConfigurationStore;
pub use runtime::ValidationError;
pub use runtime::classify_restart;
pub use runtime::validate;
pub use runtime::validate_values;
pub use views::ConfigurationSummaryView;
pub use views::DefaultConfigurationView;
pub use views::DetailedConfigurationView;
pub use views::InstancesView;
pub use views::ParameterView;
pub use views::ParametersView;
