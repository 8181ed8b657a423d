// crates/config-groups-template/src/error.rs
// ============================================================================
// Module: Template Errors
// Description: Error type for template lookup, rendering, and parsing.
// Purpose: Report renderer failures with stable kind labels.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`TemplateError`] covers every way default-configuration rendering can
//! fail. Template engine errors are carried as strings.

use thiserror::Error;

/// Template rendering and parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Service type contains characters not allowed in a template name.
    #[error("invalid service type: {0}")]
    InvalidServiceType(String),
    /// No search path or built-in template provides the name.
    #[error("template not found: {0}")]
    NotFound(String),
    /// Template engine rejected the template or the context.
    #[error("template render error: {0}")]
    Render(String),
    /// Rendered document is not valid INI.
    #[error("rendered configuration invalid at line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Failure description.
        reason: String,
    },
    /// Rendered document lacks the requested section.
    #[error("rendered configuration has no [{0}] section")]
    MissingSection(String),
}

impl TemplateError {
    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidServiceType(_) => "template_invalid_service_type",
            Self::NotFound(_) => "template_not_found",
            Self::Render(_) => "template_render",
            Self::Parse {
                ..
            } => "template_parse",
            Self::MissingSection(_) => "template_missing_section",
        }
    }
}
