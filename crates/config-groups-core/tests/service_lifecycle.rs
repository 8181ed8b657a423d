// crates/config-groups-core/tests/service_lifecycle.rs
// ============================================================================
// Module: Configuration Service Lifecycle Tests
// Description: Create, edit, update, delete, and lookup behavior.
// Purpose: Pin merge and replace laws, tenant scoping, and delete refusal.
// Dependencies: config-groups-core, serde_json
// ============================================================================
//! ## Overview
//! Drives [`ConfigurationService`] over the in-memory store and checks the
//! stored state after each operation.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::collections::BTreeMap;

use config_groups_core::AuditOperation;
use config_groups_core::AuditOutcome;
use config_groups_core::ConfigurationError;
use config_groups_core::ConfigurationService;
use config_groups_core::ConfigurationStore;
use config_groups_core::ErrorClass;
use config_groups_core::GroupChanges;
use config_groups_core::GroupId;
use config_groups_core::InstanceId;
use config_groups_core::NewGroup;
use config_groups_core::TenantId;
use config_groups_core::ValidationError;
use serde_json::Value;
use serde_json::json;

use crate::common::CapturingAuditSink;
use crate::common::TestService;
use crate::common::baseline_values;
use crate::common::service;
use crate::common::service_with_instances;
use crate::common::tenant;
use crate::common::values;

fn create(service: &TestService, items: Value) -> GroupId {
    service
        .create(
            &tenant(),
            NewGroup {
                name: "web".to_string(),
                description: Some("web tier".to_string()),
                values: values(items),
            },
        )
        .expect("create group")
        .id
}

fn stored_values(service: &TestService, group_id: &GroupId) -> BTreeMap<String, Value> {
    service.show(&tenant(), group_id).expect("show group").values
}

/// Verifies create stores every value and attaches no instances.
#[test]
fn create_stores_values_without_instances() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 10, "autocommit": true }));
    let view = service.show(&tenant(), &group_id).expect("show");
    assert_eq!(view.name, "web");
    assert_eq!(view.description.as_deref(), Some("web tier"));
    assert_eq!(view.values.get("connect_timeout"), Some(&json!(10)));
    assert_eq!(view.values.get("autocommit"), Some(&json!(true)));
    assert!(view.instances.is_empty());
    assert!(service.control().deliveries().is_empty());
}

#[test]
fn create_rejects_invalid_values_and_stores_nothing() {
    let service = service();
    let result = service.create(
        &tenant(),
        NewGroup {
            name: "web".to_string(),
            description: None,
            values: values(json!({ "connect_timeout": 10, "max_connections": 0 })),
        },
    );
    assert!(matches!(
        result,
        Err(ConfigurationError::Validation(ValidationError::BelowMinimum { .. }))
    ));
    assert!(service.list(&tenant()).expect("list").is_empty());
}

#[test]
fn create_rejects_bad_names() {
    let service = service();
    for name in [String::new(), "   ".to_string(), "n".repeat(65)] {
        let result = service.create(
            &tenant(),
            NewGroup {
                name,
                description: None,
                values: baseline_values(),
            },
        );
        let error = result.expect_err("bad name");
        assert_eq!(error.class(), ErrorClass::Client);
        assert!(matches!(error, ConfigurationError::Invalid(_)));
    }
    let result = service.create(
        &tenant(),
        NewGroup {
            name: "ok".to_string(),
            description: Some("d".repeat(257)),
            values: baseline_values(),
        },
    );
    assert!(matches!(result, Err(ConfigurationError::Invalid(_))));
}

/// Verifies the edit merge law: {a:1,b:2} edited with {b:3,c:4} yields {a:1,b:3,c:4}.
#[test]
fn edit_merges_values() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 1, "max_connections": 2 }));
    service
        .edit(&tenant(), &group_id, &values(json!({ "max_connections": 3, "key_buffer_size": 4 })))
        .expect("edit");
    let expected: BTreeMap<String, Value> = values(json!({
        "connect_timeout": 1,
        "max_connections": 3,
        "key_buffer_size": 4
    }));
    assert_eq!(stored_values(&service, &group_id), expected);
}

#[test]
fn edit_is_idempotent_per_key() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 1 }));
    let edit = values(json!({ "max_connections": 7 }));
    service.edit(&tenant(), &group_id, &edit).expect("first edit");
    let once = stored_values(&service, &group_id);
    service.edit(&tenant(), &group_id, &edit).expect("second edit");
    assert_eq!(stored_values(&service, &group_id), once);
}

/// Verifies a rejected edit leaves every stored value untouched.
#[test]
fn rejected_edit_leaves_group_unchanged() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 1, "max_connections": 2 }));
    let before = service.show(&tenant(), &group_id).expect("show");
    let result = service.edit(
        &tenant(),
        &group_id,
        &values(json!({ "connect_timeout": 50, "max_connections": "many" })),
    );
    assert!(matches!(result, Err(ConfigurationError::Validation(_))));
    assert_eq!(service.show(&tenant(), &group_id).expect("show"), before);
}

/// Verifies the update replace law: values are replaced wholesale.
#[test]
fn update_replaces_values() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 1, "max_connections": 2 }));
    service
        .update(
            &tenant(),
            &group_id,
            GroupChanges {
                values: Some(values(json!({ "key_buffer_size": 4 }))),
                ..GroupChanges::default()
            },
        )
        .expect("update");
    assert_eq!(stored_values(&service, &group_id), values(json!({ "key_buffer_size": 4 })));
}

#[test]
fn update_overwrites_name_and_description_only_when_given() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 1 }));
    let updated = service
        .update(
            &tenant(),
            &group_id,
            GroupChanges {
                name: Some("db".to_string()),
                ..GroupChanges::default()
            },
        )
        .expect("update");
    assert_eq!(updated.group.name, "db");
    assert_eq!(updated.group.description.as_deref(), Some("web tier"));
    assert_eq!(updated.group.values, values(json!({ "connect_timeout": 1 })));
    assert!(updated.propagation.instances.is_empty());
}

#[test]
fn rejected_update_leaves_name_unchanged() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 1 }));
    let result = service.update(
        &tenant(),
        &group_id,
        GroupChanges {
            name: Some("renamed".to_string()),
            values: Some(values(json!({ "unknown_key": 1 }))),
            ..GroupChanges::default()
        },
    );
    assert!(matches!(
        result,
        Err(ConfigurationError::Validation(ValidationError::UnknownParameter(_)))
    ));
    assert_eq!(service.show(&tenant(), &group_id).expect("show").name, "web");
}

/// Verifies delete is refused while instances are attached and allowed after.
#[test]
fn delete_refused_while_in_use() {
    let service = service_with_instances(&["db-1", "db-2"]);
    let group_id = create(&service, json!({ "connect_timeout": 5 }));
    for id in ["db-1", "db-2"] {
        service.assign(&tenant(), &InstanceId::new(id), Some(&group_id)).expect("assign");
    }
    let error = service.delete(&tenant(), &group_id).expect_err("in use");
    assert!(matches!(error, ConfigurationError::GroupInUse(_)));
    assert_eq!(error.class(), ErrorClass::Client);

    service.unassign(&tenant(), &InstanceId::new("db-1")).expect("unassign db-1");
    assert!(matches!(
        service.delete(&tenant(), &group_id),
        Err(ConfigurationError::GroupInUse(_))
    ));
    service.assign(&tenant(), &InstanceId::new("db-2"), None).expect("unassign db-2");
    service.delete(&tenant(), &group_id).expect("delete");
    assert!(matches!(
        service.show(&tenant(), &group_id),
        Err(ConfigurationError::GroupNotFound(_))
    ));
}

#[test]
fn lookups_are_tenant_scoped() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 5 }));
    let other = TenantId::new("tenant-b");
    let error = service.show(&other, &group_id).expect_err("other tenant");
    assert!(matches!(error, ConfigurationError::GroupNotFound(_)));
    assert_eq!(error.class(), ErrorClass::NotFound);
    assert!(service.list(&other).expect("list").is_empty());
    assert!(matches!(
        service.edit(&other, &group_id, &baseline_values()),
        Err(ConfigurationError::GroupNotFound(_))
    ));
    assert!(matches!(
        service.delete(&other, &group_id),
        Err(ConfigurationError::GroupNotFound(_))
    ));
    assert_eq!(service.list(&tenant()).expect("list").len(), 1);
}

#[test]
fn instances_view_lists_attached_instances() {
    let service = service_with_instances(&["db-2", "db-1"]);
    let group_id = create(&service, json!({}));
    service.assign(&tenant(), &InstanceId::new("db-2"), Some(&group_id)).expect("assign");
    service.assign(&tenant(), &InstanceId::new("db-1"), Some(&group_id)).expect("assign");
    let view = service.instances(&tenant(), &group_id).expect("instances");
    let ids: Vec<&str> = view.instances.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, vec!["db-1", "db-2"]);
    assert_eq!(view.instances[0].name, "db-1-name");
}

#[test]
fn parameters_and_parameter_lookup() {
    let service = service();
    let listing = service.parameters();
    assert_eq!(listing.parameters.len(), 7);
    let rule = service.parameter("connect_timeout").expect("rule");
    assert_eq!(rule.value_type, "integer");
    assert_eq!(rule.min.as_deref(), Some("1"));
    assert_eq!(rule.max.as_deref(), Some("65535"));
    assert!(rule.dynamic);
    let error = service.parameter("missing").expect_err("not found");
    assert!(matches!(error, ConfigurationError::ParameterNotFound(_)));
    assert_eq!(error.class(), ErrorClass::NotFound);
}

#[test]
fn revisions_advance_on_each_write() {
    let service = service();
    let group_id = create(&service, json!({ "connect_timeout": 5 }));
    let stored = service.store().load_group(&tenant(), &group_id).expect("load").expect("group");
    assert_eq!(stored.revision, 1);
    service.edit(&tenant(), &group_id, &values(json!({ "connect_timeout": 6 }))).expect("edit");
    let stored = service.store().load_group(&tenant(), &group_id).expect("load").expect("group");
    assert_eq!(stored.revision, 2);
}

/// Verifies every lifecycle call records exactly one audit event.
#[test]
fn lifecycle_operations_are_audited() {
    let sink = CapturingAuditSink::shared();
    let service = ConfigurationService::new(
        crate::common::rules(),
        config_groups_core::InMemoryConfigurationStore::new(),
        config_groups_core::RecordingInstanceControl::new(),
    )
    .with_audit(sink.clone());
    let group_id = service
        .create(
            &tenant(),
            NewGroup {
                name: "web".to_string(),
                description: None,
                values: baseline_values(),
            },
        )
        .expect("create")
        .id;
    let _ = service.edit(&tenant(), &group_id, &values(json!({ "bogus": 1 })));
    service.delete(&tenant(), &group_id).expect("delete");

    let events = sink.events.lock().expect("events");
    let summary: Vec<(AuditOperation, AuditOutcome, Option<&str>)> =
        events.iter().map(|event| (event.operation, event.outcome, event.error_kind)).collect();
    assert_eq!(
        summary,
        vec![
            (AuditOperation::Create, AuditOutcome::Success, None),
            (AuditOperation::Edit, AuditOutcome::Failure, Some("unknown_parameter")),
            (AuditOperation::Delete, AuditOutcome::Success, None),
        ]
    );
    assert_eq!(events[0].keys, vec!["connect_timeout".to_string(), "max_connections".to_string()]);
    assert_eq!(events[0].group_id.as_deref(), Some(group_id.as_str()));
}
