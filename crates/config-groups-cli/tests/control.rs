// crates/config-groups-cli/tests/control.rs
// ============================================================================
// Module: Template Instance Control Tests
// Description: Checks override delivery through the rendered templates.
// Purpose: Ensure deliveries are rendered, logged, and rejected on failure.
// Dependencies: config-groups-cli control, config-groups-template, serde_json
// ============================================================================

//! ## Overview
//! Drives [`TemplateInstanceControl`] with an in-memory writer.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use config_groups_cli::control::TemplateInstanceControl;
use config_groups_core::ConfigurationValues;
use config_groups_core::FlavorSpec;
use config_groups_core::InstanceControl;
use config_groups_core::InstanceControlError;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use config_groups_core::InstanceStatus;
use config_groups_core::OverrideDelivery;
use config_groups_core::ParameterValue;
use config_groups_core::RestartRequirement;
use config_groups_core::TenantId;
use config_groups_template::TemplateRenderer;
use serde_json::Value;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writer that appends into a shared buffer.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

fn instance(service_type: &str) -> InstanceRecord {
    InstanceRecord {
        id: InstanceId::new("inst-1"),
        tenant_id: TenantId::new("tenant-a"),
        name: "db".to_string(),
        service_type: service_type.to_string(),
        flavor: FlavorSpec {
            id: "1".to_string(),
            name: "m1.small".to_string(),
            ram: 512,
            vcpus: 1,
            disk: 10,
        },
        configuration_id: None,
        status: InstanceStatus::Active,
    }
}

fn delivery() -> OverrideDelivery {
    let mut overrides = ConfigurationValues::new();
    overrides.insert("max_connections".to_string(), ParameterValue::Integer(300));
    overrides.insert("autocommit".to_string(), ParameterValue::Boolean(false));
    OverrideDelivery {
        overrides,
        restart: RestartRequirement::NotRequired,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn delivery_logs_rendered_fragment() {
    let buffer = SharedBuffer::default();
    let control = TemplateInstanceControl::with_output(
        Arc::new(TemplateRenderer::new(Vec::new())),
        Box::new(buffer.clone()),
    );
    control.apply_overrides(&instance("mysql"), &delivery()).unwrap();

    let lines = buffer.lines();
    assert_eq!(lines.len(), 1);
    let entry = &lines[0];
    assert_eq!(entry["event"], "override_delivery");
    assert_eq!(entry["instance_id"], "inst-1");
    assert_eq!(entry["override_count"], 2);
    assert_eq!(entry["restart"], "not_required");
    let rendered = entry["rendered"].as_str().unwrap();
    assert!(rendered.starts_with("[mysqld]"));
    assert!(rendered.contains("max_connections = 300"));
    assert!(rendered.contains("autocommit = false"));
}

#[test]
fn unknown_service_type_is_rejected() {
    let buffer = SharedBuffer::default();
    let control = TemplateInstanceControl::with_output(
        Arc::new(TemplateRenderer::new(Vec::new())),
        Box::new(buffer.clone()),
    );
    let err = control.apply_overrides(&instance("postgresql"), &delivery()).unwrap_err();
    assert!(matches!(err, InstanceControlError::Rejected(ref id, _) if id.as_str() == "inst-1"));
    assert!(buffer.lines().is_empty());
}
