// crates/config-groups-template/src/lib.rs
// ============================================================================
// Module: Config Groups Template
// Description: Default engine configuration rendering and parsing.
// Purpose: Render per-engine configuration for an instance flavor.
// Dependencies: config-groups-core, minijinja, sha2
// ============================================================================

//! ## Overview
//! This crate renders engine configuration documents from templates found
//! on an ordered list of search paths, strips directive and comment lines,
//! and parses the result into ordered key/value pairs. Each instance also
//! gets a deterministic replication server id.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod error;
pub mod parser;
pub mod renderer;
pub mod server_id;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::TemplateError;
pub use parser::ConfigPair;
pub use parser::IniDocument;
pub use parser::IniSection;
pub use parser::section_pairs;
pub use parser::strip_comments;
pub use renderer::CONFIG_SECTION;
pub use renderer::TemplateRenderer;
pub use renderer::TemplateVariant;
pub use server_id::unique_server_id;
