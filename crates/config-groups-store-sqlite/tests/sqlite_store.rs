// crates/config-groups-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Configuration Store Tests
// Description: Persistence, revision, and association checks for the store.
// Purpose: Ensure the durable store matches the in-memory store's contract.
// Dependencies: config-groups-store-sqlite, config-groups-core, rusqlite
// ============================================================================

//! ## Overview
//! Exercises reopen persistence, revision conflicts, tenant isolation, the
//! delete-in-use rule, and fail-closed loads on corrupt or mismatched data.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    missing_docs,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use config_groups_core::ConfigurationGroup;
use config_groups_core::ConfigurationStore;
use config_groups_core::ConfigurationValues;
use config_groups_core::FlavorSpec;
use config_groups_core::GroupId;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use config_groups_core::InstanceStatus;
use config_groups_core::ParameterValue;
use config_groups_core::StoreError;
use config_groups_core::TenantId;
use config_groups_store_sqlite::SqliteConfigurationStore;
use config_groups_store_sqlite::SqliteStoreConfig;
use config_groups_store_sqlite::SqliteStoreMode;
use config_groups_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

struct SqliteFixture {
    _dir: TempDir,
    path: PathBuf,
    store: SqliteConfigurationStore,
}

impl SqliteFixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config-groups.sqlite");
        let store = SqliteConfigurationStore::new(&config(&path)).expect("open store");
        Self {
            _dir: dir,
            path,
            store,
        }
    }

    fn reopen(&self) -> SqliteConfigurationStore {
        SqliteConfigurationStore::new(&config(&self.path)).expect("reopen store")
    }
}

fn config(path: &std::path::Path) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Normal,
    }
}

fn tenant(name: &str) -> TenantId {
    TenantId::new(name)
}

fn group(tenant_id: &TenantId, id: &str) -> ConfigurationGroup {
    let mut items = ConfigurationValues::new();
    items.insert("max_connections".to_string(), ParameterValue::from(100_i64));
    items.insert("autocommit".to_string(), ParameterValue::from(true));
    items.insert("sql_mode".to_string(), ParameterValue::from("STRICT_ALL_TABLES"));
    ConfigurationGroup {
        id: GroupId::new(id),
        tenant_id: tenant_id.clone(),
        name: format!("{id}-name"),
        description: Some("tuned".to_string()),
        items,
        instances: Vec::new(),
        revision: 0,
    }
}

fn instance(tenant_id: &TenantId, id: &str, group_id: Option<&str>) -> InstanceRecord {
    InstanceRecord {
        id: InstanceId::new(id),
        tenant_id: tenant_id.clone(),
        name: format!("{id}-name"),
        service_type: "mysql".to_string(),
        flavor: FlavorSpec {
            id: "2".to_string(),
            name: "m1.medium".to_string(),
            ram: 4096,
            vcpus: 2,
            disk: 40,
        },
        configuration_id: group_id.map(GroupId::new),
        status: InstanceStatus::Active,
    }
}

// ============================================================================
// SECTION: Groups
// ============================================================================

#[test]
fn saved_group_survives_reopen() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    let original = group(&owner, "g-1");
    let revision = fixture.store.save_group(&original).expect("save");
    assert_eq!(revision, 1);

    let reopened = fixture.reopen();
    let loaded = reopened.load_group(&owner, &GroupId::new("g-1")).expect("load").expect("exists");
    assert_eq!(loaded.items, original.items);
    assert_eq!(loaded.name, "g-1-name");
    assert_eq!(loaded.description.as_deref(), Some("tuned"));
    assert_eq!(loaded.revision, 1);
}

#[test]
fn save_replaces_items_and_bumps_revision() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    let mut stored = group(&owner, "g-1");
    stored.revision = fixture.store.save_group(&stored).expect("create");

    stored.items.clear();
    stored.items.insert("connect_timeout".to_string(), ParameterValue::from(15_i64));
    let revision = fixture.store.save_group(&stored).expect("update");
    assert_eq!(revision, 2);

    let loaded = fixture.store.load_group(&owner, &stored.id).expect("load").expect("exists");
    assert_eq!(loaded.items.len(), 1);
    assert_eq!(loaded.items.get("connect_timeout"), Some(&ParameterValue::from(15_i64)));
}

/// Verifies a stale revision is rejected without touching stored items.
#[test]
fn stale_revision_conflicts() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    let mut stored = group(&owner, "g-1");
    stored.revision = fixture.store.save_group(&stored).expect("create");
    fixture.store.save_group(&stored).expect("second writer");

    stored.items.clear();
    let err = fixture.store.save_group(&stored).expect_err("stale write");
    assert!(matches!(err, StoreError::Conflict(_)));

    let loaded = fixture.store.load_group(&owner, &stored.id).expect("load").expect("exists");
    assert_eq!(loaded.items.len(), 3);
    assert_eq!(loaded.revision, 2);
}

#[test]
fn new_group_with_nonzero_revision_conflicts() {
    let fixture = SqliteFixture::new();
    let mut fresh = group(&tenant("tenant-a"), "g-1");
    fresh.revision = 4;
    let err = fixture.store.save_group(&fresh).expect_err("unknown revision");
    assert_eq!(err.kind(), "store_conflict");
}

#[test]
fn groups_are_isolated_by_tenant() {
    let fixture = SqliteFixture::new();
    let alpha = tenant("tenant-a");
    let beta = tenant("tenant-b");
    fixture.store.save_group(&group(&alpha, "g-1")).expect("alpha");
    fixture.store.save_group(&group(&beta, "g-2")).expect("beta");

    let listed = fixture.store.list_groups(&alpha).expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, GroupId::new("g-1"));
    assert!(fixture.store.load_group(&beta, &GroupId::new("g-1")).expect("load").is_none());
}

#[test]
fn listing_is_ordered_by_group_id() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    for id in ["g-3", "g-1", "g-2"] {
        fixture.store.save_group(&group(&owner, id)).expect("save");
    }
    let ids: Vec<String> = fixture
        .store
        .list_groups(&owner)
        .expect("list")
        .into_iter()
        .map(|group| group.id.to_string())
        .collect();
    assert_eq!(ids, ["g-1", "g-2", "g-3"]);
}

// ============================================================================
// SECTION: Instances
// ============================================================================

#[test]
fn loaded_group_lists_assigned_instances() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    fixture.store.save_group(&group(&owner, "g-1")).expect("save group");
    fixture.store.save_instance(&instance(&owner, "i-2", Some("g-1"))).expect("i-2");
    fixture.store.save_instance(&instance(&owner, "i-1", Some("g-1"))).expect("i-1");
    fixture.store.save_instance(&instance(&owner, "i-3", None)).expect("i-3");

    let loaded = fixture.store.load_group(&owner, &GroupId::new("g-1")).expect("load").expect("exists");
    let ids: Vec<&str> = loaded.instances.iter().map(|entry| entry.id.as_str()).collect();
    assert_eq!(ids, ["i-1", "i-2"]);
    assert_eq!(loaded.instances[0].name, "i-1-name");
}

#[test]
fn instance_round_trips_status_and_flavor() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    fixture.store.save_group(&group(&owner, "g-1")).expect("save group");
    let mut record = instance(&owner, "i-1", Some("g-1"));
    record.status = InstanceStatus::RestartRequired;
    fixture.store.save_instance(&record).expect("save");

    let loaded =
        fixture.reopen().load_instance(&owner, &record.id).expect("load").expect("exists");
    assert_eq!(loaded, record);
}

#[test]
fn instance_referencing_foreign_group_is_invalid() {
    let fixture = SqliteFixture::new();
    let alpha = tenant("tenant-a");
    let beta = tenant("tenant-b");
    fixture.store.save_group(&group(&alpha, "g-1")).expect("save group");

    let err = fixture
        .store
        .save_instance(&instance(&beta, "i-1", Some("g-1")))
        .expect_err("foreign group");
    assert!(matches!(err, StoreError::Invalid(_)));
    assert!(fixture.store.list_instances(&beta).expect("list").is_empty());
}

/// Verifies a group cannot be deleted while an instance references it.
#[test]
fn delete_in_use_group_conflicts() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    fixture.store.save_group(&group(&owner, "g-1")).expect("save group");
    let mut record = instance(&owner, "i-1", Some("g-1"));
    fixture.store.save_instance(&record).expect("assign");

    let err = fixture.store.delete_group(&owner, &GroupId::new("g-1")).expect_err("in use");
    assert!(matches!(err, StoreError::Conflict(_)));

    record.configuration_id = None;
    fixture.store.save_instance(&record).expect("unassign");
    assert!(fixture.store.delete_group(&owner, &GroupId::new("g-1")).expect("delete"));
    assert!(!fixture.store.delete_group(&owner, &GroupId::new("g-1")).expect("second delete"));
    assert!(fixture.store.load_group(&owner, &GroupId::new("g-1")).expect("load").is_none());
}

// ============================================================================
// SECTION: Integrity
// ============================================================================

#[test]
fn schema_version_mismatch_fails_closed() {
    let fixture = SqliteFixture::new();
    drop(fixture.store);
    let connection = rusqlite::Connection::open(&fixture.path).expect("raw open");
    connection.execute("UPDATE store_meta SET version = 99", []).expect("bump version");
    drop(connection);

    let Err(err) = SqliteConfigurationStore::new(&config(&fixture.path)) else {
        panic!("expected version mismatch");
    };
    assert_eq!(StoreError::from(err).kind(), "store_version_mismatch");
}

#[test]
fn corrupt_item_value_fails_closed() {
    let fixture = SqliteFixture::new();
    let owner = tenant("tenant-a");
    fixture.store.save_group(&group(&owner, "g-1")).expect("save group");
    let connection = rusqlite::Connection::open(&fixture.path).expect("raw open");
    connection
        .execute(
            "UPDATE configuration_items SET value_json = '{not json' WHERE item_key = 'autocommit'",
            [],
        )
        .expect("corrupt item");
    drop(connection);

    let err = fixture.store.load_group(&owner, &GroupId::new("g-1")).expect_err("corrupt");
    assert!(matches!(err, StoreError::Corrupt(_)));
}

#[test]
fn directory_path_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let Err(err) = SqliteConfigurationStore::new(&config(dir.path())) else {
        panic!("expected invalid path");
    };
    assert_eq!(StoreError::from(err).kind(), "store_invalid");
}

#[test]
fn readiness_succeeds_on_open_store() {
    let fixture = SqliteFixture::new();
    fixture.store.readiness().expect("ready");
}
