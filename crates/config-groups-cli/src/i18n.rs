// crates/config-groups-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and placeholder substitution for CLI output.
// Purpose: Keep every user-facing CLI string in one table.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! User-facing CLI strings live in a static catalog keyed by dotted names.
//! Messages are produced with the [`t!`](crate::t) macro, which substitutes
//! `{placeholder}` positions with named arguments.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - Unknown keys render as the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Preformatted value.
    pub value: String,
}

impl MessageArg {
    /// Creates a new message argument.
    #[must_use]
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English message catalog.
const MESSAGES: &[(&str, &str)] = &[
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid ({count} parameter rules)."),
    ("rules.load_failed", "Failed to load parameter rules from {path}: {error}"),
    ("store.open_failed", "Failed to open store at {path}: {error}"),
    ("audit.open_failed", "Failed to open audit log at {path}: {error}"),
    ("tenant.empty", "Tenant must be non-empty."),
    ("values.required", "Provide values with --values or --values-file."),
    ("values.parse_failed", "Values must be valid JSON: {error}"),
    ("values.not_object", "Values must be a JSON object."),
    ("values.valid", "Values valid ({count} parameters)."),
    ("input.read_failed", "Failed to read {path}: {error}"),
    ("input.too_large", "Refusing to read {path}: {size} bytes exceeds limit of {limit}."),
    ("input.not_utf8", "{path} is not valid UTF-8."),
    ("command.failed", "{kind}: {error}"),
    ("groups.delete.ok", "Deleted configuration group {id}."),
    ("propagation.partial", "Warning: delivery failed for {count} instance(s)."),
    ("output.json_failed", "Failed to encode output: {error}"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
];

/// Returns the lazily built catalog.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG.get_or_init(|| MESSAGES.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up a message and substitutes its placeholders.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
