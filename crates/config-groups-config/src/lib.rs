// crates/config-groups-config/src/lib.rs
// ============================================================================
// Module: Config Groups Config Library
// Description: Service configuration model and validation.
// Purpose: Single source of truth for config-groups.toml semantics.
// Dependencies: config-groups-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `config-groups-config` defines the configuration model for the
//! configuration groups service: where rules come from, which store backs
//! groups and instances, where templates are searched, and where audit events
//! go. Loading is strict and fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
