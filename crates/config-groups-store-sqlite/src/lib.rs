// crates/config-groups-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Configuration Store
// Description: Durable ConfigurationStore backend using SQLite WAL.
// Purpose: Provide production persistence for configuration groups.
// Dependencies: config-groups-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ConfigurationStore`] implementation
//! that keeps groups, their items, and instance associations in normalized
//! tables. Group writes are guarded by a revision counter so concurrent
//! writers are detected instead of silently overwriting each other.
//!
//! [`ConfigurationStore`]: config_groups_core::ConfigurationStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteConfigurationStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
