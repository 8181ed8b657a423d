// crates/config-groups-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared fixtures for configuration group integration tests.
// Purpose: Reduce duplication across integration tests for config-groups-core.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::sync::Arc;
use std::sync::Mutex;

use config_groups_core::ConfigurationAuditEvent;
use config_groups_core::ConfigurationAuditSink;
use config_groups_core::ConfigurationService;
use config_groups_core::FlavorSpec;
use config_groups_core::InMemoryConfigurationStore;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use config_groups_core::InstanceStatus;
use config_groups_core::PropagationAuditEvent;
use config_groups_core::ProposedValues;
use config_groups_core::RecordingInstanceControl;
use config_groups_core::RuleTable;
use config_groups_core::TenantId;
use serde_json::Value;
use serde_json::json;

/// Service type used by test fixtures.
pub type TestService = ConfigurationService<InMemoryConfigurationStore, RecordingInstanceControl>;

/// Rule document covering each rule kind with dynamic and non-dynamic entries.
pub const RULES_JSON: &str = r#"{
  "configuration-parameters": [
    { "name": "autocommit", "type": "boolean", "dynamic": true },
    { "name": "character_set_server", "type": "string", "dynamic": false },
    { "name": "connect_timeout", "type": "integer", "min": "1", "max": "65535", "dynamic": true },
    { "name": "innodb_buffer_pool_size", "type": "integer", "min": "0", "max": "68719476736", "dynamic": false },
    { "name": "key_buffer_size", "type": "integer", "min": "0", "max": "4294967296", "dynamic": true },
    { "name": "max_connections", "type": "integer", "min": "1", "max": 65535, "dynamic": true },
    { "name": "sql_mode", "type": "string", "dynamic": true }
  ]
}"#;

/// Returns the shared rule table.
pub fn rules() -> RuleTable {
    RuleTable::from_json_str(RULES_JSON).expect("fixture rules parse")
}

/// Builds proposed values from a JSON object literal.
pub fn values(object: Value) -> ProposedValues {
    match object {
        Value::Object(map) => map.into_iter().collect(),
        other => panic!("expected JSON object, got {other}"),
    }
}

/// Returns the default test tenant.
pub fn tenant() -> TenantId {
    TenantId::new("tenant-a")
}

/// Returns an instance record with no group assigned.
pub fn instance(tenant_id: &TenantId, id: &str) -> InstanceRecord {
    InstanceRecord {
        id: InstanceId::new(id),
        tenant_id: tenant_id.clone(),
        name: format!("{id}-name"),
        service_type: "mysql".to_string(),
        flavor: FlavorSpec {
            id: "1".to_string(),
            name: "m1.small".to_string(),
            ram: 2048,
            vcpus: 1,
            disk: 20,
        },
        configuration_id: None,
        status: InstanceStatus::Active,
    }
}

/// Builds a service over the fixture rules with a fresh in-memory store.
pub fn service() -> TestService {
    ConfigurationService::new(
        rules(),
        InMemoryConfigurationStore::new(),
        RecordingInstanceControl::new(),
    )
}

/// Builds a service with registered instances for the default tenant.
pub fn service_with_instances(ids: &[&str]) -> TestService {
    let service = service();
    for id in ids {
        service.register_instance(&instance(&tenant(), id)).expect("register instance");
    }
    service
}

/// Returns a baseline object used by many lifecycle tests.
pub fn baseline_values() -> ProposedValues {
    values(json!({ "connect_timeout": 10, "max_connections": 100 }))
}

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct CapturingAuditSink {
    /// Lifecycle events in order.
    pub events: Mutex<Vec<ConfigurationAuditEvent>>,
    /// Propagation events in order.
    pub propagations: Mutex<Vec<PropagationAuditEvent>>,
}

impl CapturingAuditSink {
    /// Creates a shareable sink.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

impl ConfigurationAuditSink for CapturingAuditSink {
    fn record(&self, event: &ConfigurationAuditEvent) {
        self.events.lock().expect("audit lock").push(event.clone());
    }

    fn record_propagation(&self, event: &PropagationAuditEvent) {
        self.propagations.lock().expect("audit lock").push(event.clone());
    }
}
