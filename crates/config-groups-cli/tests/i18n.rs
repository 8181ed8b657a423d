// crates/config-groups-cli/tests/i18n.rs
// ============================================================================
// Module: CLI Message Catalog Tests
// Description: Exercises catalog lookup and placeholder substitution.
// Purpose: Ensure CLI strings route through stable catalog helpers.
// Dependencies: config-groups-cli i18n module and the `t!` macro.
// ============================================================================

//! ## Overview
//! Validates catalog lookup, key fallback, and the
//! [`t!`](config_groups_cli::t) macro.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use config_groups_cli::i18n::MessageArg;
use config_groups_cli::i18n::translate;
use config_groups_cli::t;

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Confirms catalog entries resolve and replace placeholders.
#[test]
fn translate_substitutes_placeholders() {
    let args = vec![MessageArg::new("id", "grp-1")];
    assert_eq!(translate("groups.delete.ok", args), "Deleted configuration group grp-1.");
}

/// Confirms missing keys fall back to the key string.
#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("missing.key", Vec::new()), "missing.key");
}

/// Confirms the t! macro formats every named argument.
#[test]
fn t_macro_formats_message() {
    let rendered = t!("command.failed", kind = "group_in_use", error = "group g is in use");
    assert_eq!(rendered, "group_in_use: group g is in use");
}

/// Unsupplied placeholders are left in place.
#[test]
fn t_macro_keeps_unsupplied_placeholders() {
    let rendered = t!("input.too_large", path = "values.json");
    assert!(rendered.contains("values.json"));
    assert!(rendered.contains("{size}"));
}
