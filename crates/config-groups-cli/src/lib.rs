// crates/config-groups-cli/src/lib.rs
// ============================================================================
// Module: Config Groups CLI Library
// Description: Shared pieces of the config-groups binary.
// Purpose: Expose the message catalog and instance control for tests.
// Dependencies: config-groups-core, config-groups-template, serde_json
// ============================================================================

//! ## Overview
//! The `config-groups` binary is a thin dispatcher; the parts worth testing
//! on their own live here: the message catalog behind [`t!`] and the
//! template-backed instance control used to deliver overrides.

pub mod control;
pub mod i18n;
