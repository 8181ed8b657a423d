// crates/config-groups-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Configuration Store
// Description: Durable ConfigurationStore backed by SQLite WAL.
// Purpose: Persist groups, items, and instance associations transactionally.
// Dependencies: config-groups-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`ConfigurationStore`] using `SQLite`.
//! Each group row carries a revision; a save succeeds only when the caller's
//! revision matches the stored one, and the item rows are replaced in the same
//! transaction. Item values are stored as JSON scalars. Loads fail closed on
//! rows that do not decode.

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use config_groups_core::ConfigurationGroup;
use config_groups_core::ConfigurationStore;
use config_groups_core::ConfigurationValues;
use config_groups_core::FlavorSpec;
use config_groups_core::GroupId;
use config_groups_core::InstanceId;
use config_groups_core::InstanceRecord;
use config_groups_core::InstanceRef;
use config_groups_core::InstanceStatus;
use config_groups_core::MAX_ITEM_VALUE_LENGTH;
use config_groups_core::ParameterValue;
use config_groups_core::StoreError;
use config_groups_core::TenantId;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum stored item value JSON length (quoted string plus escapes).
const MAX_VALUE_JSON_BYTES: usize = MAX_ITEM_VALUE_LENGTH * 6 + 2;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` configuration store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Returns a configuration with default pragmas for the given path.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored rows fail to decode.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Revision check failed.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
        }
    }
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Db(error.to_string())
    }
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed configuration store with WAL support.
#[derive(Clone)]
pub struct SqliteConfigurationStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteConfigurationStore {
    /// Opens an `SQLite`-backed configuration store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Lists groups for a tenant.
    fn list_group_rows(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ConfigurationGroup>, SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        let rows = {
            let mut statement = tx.prepare(
                "SELECT group_id, name, description, revision FROM configurations WHERE \
                 tenant_id = ?1 ORDER BY group_id",
            )?;
            let rows = statement
                .query_map(params![tenant_id.as_str()], |row| {
                    Ok(GroupRow {
                        group_id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                        revision: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        let groups = rows
            .into_iter()
            .map(|row| hydrate_group(&tx, tenant_id, row))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        drop(guard);
        Ok(groups)
    }

    /// Loads one group for a tenant.
    fn load_group_row(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<Option<ConfigurationGroup>, SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        let row = select_group_row(&tx, tenant_id, group_id)?;
        let group = row.map(|row| hydrate_group(&tx, tenant_id, row)).transpose()?;
        tx.commit()?;
        drop(guard);
        Ok(group)
    }

    /// Saves a group and replaces its items when the revision matches.
    fn save_group_row(&self, group: &ConfigurationGroup) -> Result<u64, SqliteStoreError> {
        let expected = revision_to_sql(group.revision)?;
        let mut encoded = Vec::with_capacity(group.items.len());
        for (key, value) in &group.items {
            let value_json = serde_json::to_string(value)
                .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
            encoded.push((key.as_str(), value_json));
        }
        let now = unix_millis();
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        let stored: Option<i64> = tx
            .query_row(
                "SELECT revision FROM configurations WHERE tenant_id = ?1 AND group_id = ?2",
                params![group.tenant_id.as_str(), group.id.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let stored_revision = stored.unwrap_or(0);
        if stored_revision != expected {
            return Err(SqliteStoreError::Conflict(format!(
                "group {} revision {} does not match stored revision {stored_revision}",
                group.id, group.revision
            )));
        }
        let next = stored_revision.checked_add(1).ok_or_else(|| {
            SqliteStoreError::Corrupt(format!("revision overflow for group {}", group.id))
        })?;
        if stored.is_some() {
            tx.execute(
                "UPDATE configurations SET name = ?3, description = ?4, revision = ?5, \
                 updated_at = ?6 WHERE tenant_id = ?1 AND group_id = ?2",
                params![
                    group.tenant_id.as_str(),
                    group.id.as_str(),
                    group.name,
                    group.description,
                    next,
                    now
                ],
            )?;
            tx.execute(
                "DELETE FROM configuration_items WHERE tenant_id = ?1 AND group_id = ?2",
                params![group.tenant_id.as_str(), group.id.as_str()],
            )?;
        } else {
            tx.execute(
                "INSERT INTO configurations (tenant_id, group_id, name, description, revision, \
                 created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    group.tenant_id.as_str(),
                    group.id.as_str(),
                    group.name,
                    group.description,
                    next,
                    now
                ],
            )?;
        }
        {
            let mut insert = tx.prepare(
                "INSERT INTO configuration_items (tenant_id, group_id, item_key, value_json) \
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for (key, value_json) in &encoded {
                insert.execute(params![
                    group.tenant_id.as_str(),
                    group.id.as_str(),
                    key,
                    value_json
                ])?;
            }
        }
        tx.commit()?;
        drop(guard);
        revision_from_sql(next)
    }

    /// Deletes a group that no instance references.
    fn delete_group_row(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<bool, SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        let attached: i64 = tx.query_row(
            "SELECT COUNT(*) FROM instances WHERE tenant_id = ?1 AND configuration_id = ?2",
            params![tenant_id.as_str(), group_id.as_str()],
            |row| row.get(0),
        )?;
        if attached > 0 {
            return Err(SqliteStoreError::Conflict(format!("group {group_id} still has instances")));
        }
        let removed = tx.execute(
            "DELETE FROM configurations WHERE tenant_id = ?1 AND group_id = ?2",
            params![tenant_id.as_str(), group_id.as_str()],
        )?;
        tx.commit()?;
        drop(guard);
        Ok(removed > 0)
    }

    /// Loads one instance record.
    fn load_instance_row(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<Option<InstanceRecord>, SqliteStoreError> {
        let guard = self.lock()?;
        let row = guard
            .query_row(
                "SELECT instance_id, name, service_type, flavor_json, configuration_id, status \
                 FROM instances WHERE tenant_id = ?1 AND instance_id = ?2",
                params![tenant_id.as_str(), instance_id.as_str()],
                InstanceRow::from_row,
            )
            .optional()?;
        drop(guard);
        row.map(|row| row.into_record(tenant_id)).transpose()
    }

    /// Inserts or replaces one instance record.
    fn save_instance_row(&self, instance: &InstanceRecord) -> Result<(), SqliteStoreError> {
        let flavor_json = serde_json::to_string(&instance.flavor)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let mut guard = self.lock()?;
        let tx = guard.transaction()?;
        if let Some(group_id) = &instance.configuration_id
            && select_group_row(&tx, &instance.tenant_id, group_id)?.is_none()
        {
            return Err(SqliteStoreError::Invalid(format!(
                "instance {} references unknown group {group_id}",
                instance.id
            )));
        }
        tx.execute(
            "INSERT INTO instances (tenant_id, instance_id, name, service_type, flavor_json, \
             configuration_id, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT(tenant_id, \
             instance_id) DO UPDATE SET name = excluded.name, service_type = \
             excluded.service_type, flavor_json = excluded.flavor_json, configuration_id = \
             excluded.configuration_id, status = excluded.status",
            params![
                instance.tenant_id.as_str(),
                instance.id.as_str(),
                instance.name,
                instance.service_type,
                flavor_json,
                instance.configuration_id.as_ref().map(GroupId::as_str),
                instance.status.as_str()
            ],
        )?;
        tx.commit()?;
        drop(guard);
        Ok(())
    }

    /// Lists instance records for a tenant.
    fn list_instance_rows(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<InstanceRecord>, SqliteStoreError> {
        let guard = self.lock()?;
        let rows = {
            let mut statement = guard.prepare(
                "SELECT instance_id, name, service_type, flavor_json, configuration_id, status \
                 FROM instances WHERE tenant_id = ?1 ORDER BY instance_id",
            )?;
            let rows = statement
                .query_map(params![tenant_id.as_str()], InstanceRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };
        drop(guard);
        rows.into_iter().map(|row| row.into_record(tenant_id)).collect()
    }
}

impl ConfigurationStore for SqliteConfigurationStore {
    fn list_groups(&self, tenant_id: &TenantId) -> Result<Vec<ConfigurationGroup>, StoreError> {
        self.list_group_rows(tenant_id).map_err(StoreError::from)
    }

    fn load_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<Option<ConfigurationGroup>, StoreError> {
        self.load_group_row(tenant_id, group_id).map_err(StoreError::from)
    }

    fn save_group(&self, group: &ConfigurationGroup) -> Result<u64, StoreError> {
        self.save_group_row(group).map_err(StoreError::from)
    }

    fn delete_group(&self, tenant_id: &TenantId, group_id: &GroupId) -> Result<bool, StoreError> {
        self.delete_group_row(tenant_id, group_id).map_err(StoreError::from)
    }

    fn load_instance(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<Option<InstanceRecord>, StoreError> {
        self.load_instance_row(tenant_id, instance_id).map_err(StoreError::from)
    }

    fn save_instance(&self, instance: &InstanceRecord) -> Result<(), StoreError> {
        self.save_instance_row(instance).map_err(StoreError::from)
    }

    fn list_instances(&self, tenant_id: &TenantId) -> Result<Vec<InstanceRecord>, StoreError> {
        self.list_instance_rows(tenant_id).map_err(StoreError::from)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        let guard = self.lock()?;
        guard
            .query_row("SELECT 1", params![], |row| row.get::<_, i64>(0))
            .map_err(|err| StoreError::Store(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

// ============================================================================//
// SECTION: Rows
// ============================================================================//

/// Raw `configurations` row.
struct GroupRow {
    /// Group identifier.
    group_id: String,
    /// Display name.
    name: String,
    /// Optional description.
    description: Option<String>,
    /// Stored revision.
    revision: i64,
}

/// Raw `instances` row.
struct InstanceRow {
    /// Instance identifier.
    instance_id: String,
    /// Display name.
    name: String,
    /// Engine type.
    service_type: String,
    /// Flavor JSON.
    flavor_json: String,
    /// Assigned group.
    configuration_id: Option<String>,
    /// Status label.
    status: String,
}

impl InstanceRow {
    /// Reads the selected columns in declaration order.
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            instance_id: row.get(0)?,
            name: row.get(1)?,
            service_type: row.get(2)?,
            flavor_json: row.get(3)?,
            configuration_id: row.get(4)?,
            status: row.get(5)?,
        })
    }

    /// Decodes the row into an instance record.
    fn into_record(self, tenant_id: &TenantId) -> Result<InstanceRecord, SqliteStoreError> {
        let flavor: FlavorSpec = serde_json::from_str(&self.flavor_json).map_err(|err| {
            SqliteStoreError::Corrupt(format!("instance {} flavor: {err}", self.instance_id))
        })?;
        Ok(InstanceRecord {
            status: parse_status(&self.status)?,
            id: InstanceId::new(self.instance_id),
            tenant_id: tenant_id.clone(),
            name: self.name,
            service_type: self.service_type,
            flavor,
            configuration_id: self.configuration_id.map(GroupId::new),
        })
    }
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Selects one group row.
fn select_group_row(
    connection: &Connection,
    tenant_id: &TenantId,
    group_id: &GroupId,
) -> Result<Option<GroupRow>, SqliteStoreError> {
    connection
        .query_row(
            "SELECT group_id, name, description, revision FROM configurations WHERE tenant_id = \
             ?1 AND group_id = ?2",
            params![tenant_id.as_str(), group_id.as_str()],
            |row| {
                Ok(GroupRow {
                    group_id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    revision: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(SqliteStoreError::from)
}

/// Loads items and instance references for a group row.
fn hydrate_group(
    connection: &Connection,
    tenant_id: &TenantId,
    row: GroupRow,
) -> Result<ConfigurationGroup, SqliteStoreError> {
    let mut items = ConfigurationValues::new();
    {
        let mut statement = connection.prepare(
            "SELECT item_key, value_json FROM configuration_items WHERE tenant_id = ?1 AND \
             group_id = ?2 ORDER BY item_key",
        )?;
        let pairs = statement
            .query_map(params![tenant_id.as_str(), row.group_id], |item| {
                Ok((item.get::<_, String>(0)?, item.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        for (key, value_json) in pairs {
            if value_json.len() > MAX_VALUE_JSON_BYTES {
                return Err(SqliteStoreError::Corrupt(format!(
                    "item {key} of group {} exceeds value size limit",
                    row.group_id
                )));
            }
            let value: ParameterValue = serde_json::from_str(&value_json).map_err(|err| {
                SqliteStoreError::Corrupt(format!("item {key} of group {}: {err}", row.group_id))
            })?;
            items.insert(key, value);
        }
    }
    let instances = {
        let mut statement = connection.prepare(
            "SELECT instance_id, name FROM instances WHERE tenant_id = ?1 AND configuration_id = \
             ?2 ORDER BY instance_id",
        )?;
        let refs = statement
            .query_map(params![tenant_id.as_str(), row.group_id], |item| {
                Ok(InstanceRef {
                    id: InstanceId::new(item.get::<_, String>(0)?),
                    name: item.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        refs
    };
    Ok(ConfigurationGroup {
        revision: revision_from_sql(row.revision)?,
        id: GroupId::new(row.group_id),
        tenant_id: tenant_id.clone(),
        name: row.name,
        description: row.description,
        items,
        instances,
    })
}

/// Parses a stored status label.
fn parse_status(label: &str) -> Result<InstanceStatus, SqliteStoreError> {
    match label {
        "ACTIVE" => Ok(InstanceStatus::Active),
        "RESTART_REQUIRED" => Ok(InstanceStatus::RestartRequired),
        other => Err(SqliteStoreError::Corrupt(format!("unknown instance status: {other}"))),
    }
}

/// Converts a revision into its column form.
fn revision_to_sql(revision: u64) -> Result<i64, SqliteStoreError> {
    i64::try_from(revision).map_err(|_| SqliteStoreError::Invalid("revision too large".to_string()))
}

/// Converts a revision column into its model form.
fn revision_from_sql(revision: i64) -> Result<u64, SqliteStoreError> {
    u64::try_from(revision).map_err(|_| SqliteStoreError::Corrupt("negative revision".to_string()))
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durable defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))?;
    connection.busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS configurations (
                    tenant_id TEXT NOT NULL,
                    group_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    description TEXT,
                    revision INTEGER NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (tenant_id, group_id)
                );
                CREATE TABLE IF NOT EXISTS configuration_items (
                    tenant_id TEXT NOT NULL,
                    group_id TEXT NOT NULL,
                    item_key TEXT NOT NULL,
                    value_json TEXT NOT NULL,
                    PRIMARY KEY (tenant_id, group_id, item_key),
                    FOREIGN KEY (tenant_id, group_id)
                        REFERENCES configurations(tenant_id, group_id) ON DELETE CASCADE
                );
                CREATE TABLE IF NOT EXISTS instances (
                    tenant_id TEXT NOT NULL,
                    instance_id TEXT NOT NULL,
                    name TEXT NOT NULL,
                    service_type TEXT NOT NULL,
                    flavor_json TEXT NOT NULL,
                    configuration_id TEXT,
                    status TEXT NOT NULL,
                    PRIMARY KEY (tenant_id, instance_id),
                    FOREIGN KEY (tenant_id, configuration_id)
                        REFERENCES configurations(tenant_id, group_id)
                );
                CREATE INDEX IF NOT EXISTS idx_instances_configuration
                    ON instances (tenant_id, configuration_id);",
            )?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit()?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
