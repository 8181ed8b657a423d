// crates/config-groups-template/src/renderer.rs
// ============================================================================
// Module: Template Renderer
// Description: Renders engine configuration templates for an instance flavor.
// Purpose: Produce default and override configuration documents.
// Dependencies: config-groups-core, minijinja
// ============================================================================

//! ## Overview
//! [`TemplateRenderer`] owns a template environment whose loader walks an
//! ordered list of search paths and falls back to the templates compiled into
//! this crate. The first path that provides a name wins. Templates are named
//! `<service_type>.config.template` and
//! `<service_type>.override.config.template` and see the variables `flavor`
//! and `server_id`; override templates also see `overrides`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use config_groups_core::ConfigurationValues;
use config_groups_core::DefaultConfigurationView;
use config_groups_core::FlavorSpec;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use minijinja::Environment;
use minijinja::ErrorKind;
use minijinja::Template;
use minijinja::context;

use crate::error::TemplateError;
use crate::parser::ConfigPair;
use crate::parser::section_pairs;
use crate::parser::strip_comments;
use crate::server_id::unique_server_id;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum template file size in bytes.
pub const MAX_TEMPLATE_BYTES: u64 = 256 * 1024;
/// Maximum service type length.
pub const MAX_SERVICE_TYPE_LENGTH: usize = 64;
/// Section holding the engine server settings.
pub const CONFIG_SECTION: &str = "mysqld";

/// Templates compiled into the crate, consulted after every search path.
const BUILTIN_TEMPLATES: [(&str, &str); 2] = [
    ("mysql.config.template", include_str!("../templates/mysql.config.template")),
    (
        "mysql.override.config.template",
        include_str!("../templates/mysql.override.config.template"),
    ),
];

// ============================================================================
// SECTION: Variants
// ============================================================================

/// Which template file to render for a service type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateVariant {
    /// Full default configuration.
    #[default]
    Default,
    /// Override fragment carrying group values.
    Override,
}

impl TemplateVariant {
    /// Returns the template name for a service type.
    #[must_use]
    pub fn template_name(self, service_type: &str) -> String {
        match self {
            Self::Default => format!("{service_type}.config.template"),
            Self::Override => format!("{service_type}.override.config.template"),
        }
    }
}

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Renders engine configuration templates.
pub struct TemplateRenderer {
    /// Template environment with the search-path loader installed.
    env: Environment<'static>,
    /// Search paths in lookup order.
    search_paths: Vec<PathBuf>,
}

impl TemplateRenderer {
    /// Creates a renderer that searches the given directories in order.
    #[must_use]
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        let mut env = Environment::new();
        let roots = search_paths.clone();
        env.set_loader(move |name| load_template(&roots, name));
        Self {
            env,
            search_paths,
        }
    }

    /// Returns the configured search paths.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Renders the default configuration for a service type.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the template is missing or fails to
    /// render.
    pub fn render(
        &self,
        service_type: &str,
        flavor: &FlavorSpec,
        instance_id: &InstanceId,
    ) -> Result<String, TemplateError> {
        let template = self.template(service_type, TemplateVariant::Default)?;
        template
            .render(context! {
                flavor => flavor,
                server_id => unique_server_id(instance_id),
            })
            .map_err(|err| TemplateError::Render(err.to_string()))
    }

    /// Renders the override fragment carrying a group's values.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when the template is missing or fails to
    /// render.
    pub fn render_override(
        &self,
        service_type: &str,
        flavor: &FlavorSpec,
        instance_id: &InstanceId,
        overrides: &ConfigurationValues,
    ) -> Result<String, TemplateError> {
        let template = self.template(service_type, TemplateVariant::Override)?;
        let rendered_values: BTreeMap<&str, String> =
            overrides.iter().map(|(key, value)| (key.as_str(), value.to_string())).collect();
        template
            .render(context! {
                flavor => flavor,
                server_id => unique_server_id(instance_id),
                overrides => rendered_values,
            })
            .map_err(|err| TemplateError::Render(err.to_string()))
    }

    /// Renders the default configuration and returns its server settings.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when rendering fails or the output has no
    /// server section.
    pub fn render_pairs(
        &self,
        service_type: &str,
        flavor: &FlavorSpec,
        instance_id: &InstanceId,
    ) -> Result<Vec<ConfigPair>, TemplateError> {
        let rendered = self.render(service_type, flavor, instance_id)?;
        section_pairs(&strip_comments(&rendered), CONFIG_SECTION)
    }

    /// Builds the default configuration view for an instance.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when rendering or parsing fails.
    pub fn default_configuration(
        &self,
        instance: &InstanceRecord,
    ) -> Result<DefaultConfigurationView, TemplateError> {
        let configuration =
            self.render_pairs(&instance.service_type, &instance.flavor, &instance.id)?;
        Ok(DefaultConfigurationView {
            instance_id: instance.id.clone(),
            service_type: instance.service_type.clone(),
            flavor_id: instance.flavor.id.clone(),
            configuration,
        })
    }

    /// Looks up a template after checking the service type.
    fn template(
        &self,
        service_type: &str,
        variant: TemplateVariant,
    ) -> Result<Template<'_, '_>, TemplateError> {
        validate_service_type(service_type)?;
        let name = variant.template_name(service_type);
        self.env.get_template(&name).map_err(|err| {
            if err.kind() == ErrorKind::TemplateNotFound {
                TemplateError::NotFound(name.clone())
            } else {
                TemplateError::Render(err.to_string())
            }
        })
    }
}

// ============================================================================
// SECTION: Loader
// ============================================================================

/// Resolves a template name against the search paths, then the built-ins.
fn load_template(roots: &[PathBuf], name: &str) -> Result<Option<String>, minijinja::Error> {
    if !is_plain_file_name(name) {
        return Ok(None);
    }
    for root in roots {
        let path = root.join(name);
        if let Some(source) = read_template_file(&path)? {
            return Ok(Some(source));
        }
    }
    Ok(BUILTIN_TEMPLATES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(_, source)| (*source).to_string()))
}

/// Reads a template file if it exists and is within the size limit.
fn read_template_file(path: &Path) -> Result<Option<String>, minijinja::Error> {
    let Ok(metadata) = fs::metadata(path) else {
        return Ok(None);
    };
    if !metadata.is_file() {
        return Ok(None);
    }
    if metadata.len() > MAX_TEMPLATE_BYTES {
        return Err(minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("template {} exceeds {MAX_TEMPLATE_BYTES} bytes", path.display()),
        ));
    }
    fs::read_to_string(path).map(Some).map_err(|err| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("failed to read template {}: {err}", path.display()),
        )
    })
}

/// Returns true for names without separators or parent references.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != ".." && !name.starts_with('.')
}

/// Checks that a service type can name a template.
fn validate_service_type(service_type: &str) -> Result<(), TemplateError> {
    let valid = !service_type.is_empty()
        && service_type.len() <= MAX_SERVICE_TYPE_LENGTH
        && service_type
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_');
    if valid { Ok(()) } else { Err(TemplateError::InvalidServiceType(service_type.to_string())) }
}
