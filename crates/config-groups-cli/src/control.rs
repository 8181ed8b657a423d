// crates/config-groups-cli/src/control.rs
// ============================================================================
// Module: Template Instance Control
// Description: Instance control that renders override fragments and logs them.
// Purpose: Deliver overrides from the CLI without a live engine agent.
// Dependencies: config-groups-core, config-groups-template, serde, serde_json
// ============================================================================

//! ## Overview
//! [`TemplateInstanceControl`] renders the engine override fragment for every
//! delivery and writes one JSON line describing it to its output (stderr by
//! default). A fragment that fails to render is reported as a rejected
//! delivery for that instance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use config_groups_core::InstanceControl;
use config_groups_core::InstanceControlError;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use config_groups_core::OverrideDelivery;
use config_groups_core::RestartRequirement;
use config_groups_template::TemplateRenderer;
use serde::Serialize;

// ============================================================================
// SECTION: Delivery Log
// ============================================================================

/// JSON line written for each delivery.
#[derive(Debug, Serialize)]
pub struct DeliveryLogEntry<'a> {
    /// Event label.
    pub event: &'static str,
    /// Target instance.
    pub instance_id: &'a InstanceId,
    /// Engine type.
    pub service_type: &'a str,
    /// Number of delivered overrides.
    pub override_count: usize,
    /// Restart classification of the delivery.
    pub restart: RestartRequirement,
    /// Rendered override fragment.
    pub rendered: &'a str,
}

// ============================================================================
// SECTION: Control
// ============================================================================

/// Instance control backed by the override templates.
pub struct TemplateInstanceControl {
    /// Renderer for override fragments.
    renderer: Arc<TemplateRenderer>,
    /// Destination for delivery log lines.
    output: Mutex<Box<dyn Write + Send>>,
}

impl TemplateInstanceControl {
    /// Creates a control that logs deliveries to stderr.
    #[must_use]
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self::with_output(renderer, Box::new(io::stderr()))
    }

    /// Creates a control that logs deliveries to the given writer.
    #[must_use]
    pub fn with_output(renderer: Arc<TemplateRenderer>, output: Box<dyn Write + Send>) -> Self {
        Self {
            renderer,
            output: Mutex::new(output),
        }
    }
}

impl InstanceControl for TemplateInstanceControl {
    fn apply_overrides(
        &self,
        instance: &InstanceRecord,
        delivery: &OverrideDelivery,
    ) -> Result<(), InstanceControlError> {
        let rendered = self
            .renderer
            .render_override(
                &instance.service_type,
                &instance.flavor,
                &instance.id,
                &delivery.overrides,
            )
            .map_err(|err| InstanceControlError::Rejected(instance.id.clone(), err.to_string()))?;
        let entry = DeliveryLogEntry {
            event: "override_delivery",
            instance_id: &instance.id,
            service_type: &instance.service_type,
            override_count: delivery.overrides.len(),
            restart: delivery.restart,
            rendered: &rendered,
        };
        let line = serde_json::to_string(&entry)
            .map_err(|err| InstanceControlError::Rejected(instance.id.clone(), err.to_string()))?;
        let mut output = self.output.lock().map_err(|_| {
            InstanceControlError::Unreachable(instance.id.clone(), "output mutex poisoned".to_string())
        })?;
        writeln!(output, "{line}")
            .map_err(|err| InstanceControlError::Unreachable(instance.id.clone(), err.to_string()))
    }
}
