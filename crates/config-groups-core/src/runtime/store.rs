// crates/config-groups-core/src/runtime/store.rs
// ============================================================================
// Module: Config Groups In-Memory Store
// Description: Simple in-memory configuration store for tests and examples.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of
//! [`ConfigurationStore`] for tests and local demos, plus a shared wrapper for
//! selecting a store implementation at runtime. The in-memory store follows
//! the same revision and association rules as the durable store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::ConfigurationGroup;
use crate::core::GroupId;
use crate::core::InstanceId;
use crate::core::InstanceRecord;
use crate::core::InstanceRef;
use crate::core::TenantId;
use crate::interfaces::ConfigurationStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Store contents guarded by a single mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Groups keyed by tenant and group identifier (instances left empty).
    groups: BTreeMap<(TenantId, GroupId), ConfigurationGroup>,
    /// Instance records keyed by tenant and instance identifier.
    instances: BTreeMap<(TenantId, InstanceId), InstanceRecord>,
}

impl MemoryState {
    /// Returns references for instances assigned to a group.
    fn instance_refs(&self, tenant_id: &TenantId, group_id: &GroupId) -> Vec<InstanceRef> {
        self.instances
            .values()
            .filter(|instance| {
                &instance.tenant_id == tenant_id
                    && instance.configuration_id.as_ref() == Some(group_id)
            })
            .map(InstanceRecord::reference)
            .collect()
    }

    /// Returns a stored group with its derived instance references.
    fn hydrate(&self, group: &ConfigurationGroup) -> ConfigurationGroup {
        let mut group = group.clone();
        group.instances = self.instance_refs(&group.tenant_id, &group.id);
        group
    }
}

/// In-memory configuration store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConfigurationStore {
    /// Store contents protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryConfigurationStore {
    /// Creates a new in-memory configuration store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Locks the store contents.
    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Store("configuration store mutex poisoned".to_string()))
    }
}

impl ConfigurationStore for InMemoryConfigurationStore {
    fn list_groups(&self, tenant_id: &TenantId) -> Result<Vec<ConfigurationGroup>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .groups
            .iter()
            .filter(|((owner, _), _)| owner == tenant_id)
            .map(|(_, group)| guard.hydrate(group))
            .collect())
    }

    fn load_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<Option<ConfigurationGroup>, StoreError> {
        let guard = self.lock()?;
        let key = (tenant_id.clone(), group_id.clone());
        Ok(guard.groups.get(&key).map(|group| guard.hydrate(group)))
    }

    fn save_group(&self, group: &ConfigurationGroup) -> Result<u64, StoreError> {
        let mut guard = self.lock()?;
        let key = (group.tenant_id.clone(), group.id.clone());
        let stored_revision = guard.groups.get(&key).map_or(0, |stored| stored.revision);
        if stored_revision != group.revision {
            return Err(StoreError::Conflict(format!(
                "group {} revision {} does not match stored revision {stored_revision}",
                group.id, group.revision
            )));
        }
        let revision = stored_revision + 1;
        let mut stored = group.clone();
        stored.instances = Vec::new();
        stored.revision = revision;
        guard.groups.insert(key, stored);
        drop(guard);
        Ok(revision)
    }

    fn delete_group(&self, tenant_id: &TenantId, group_id: &GroupId) -> Result<bool, StoreError> {
        let mut guard = self.lock()?;
        if !guard.instance_refs(tenant_id, group_id).is_empty() {
            return Err(StoreError::Conflict(format!("group {group_id} still has instances")));
        }
        let removed = guard.groups.remove(&(tenant_id.clone(), group_id.clone())).is_some();
        drop(guard);
        Ok(removed)
    }

    fn load_instance(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<Option<InstanceRecord>, StoreError> {
        let guard = self.lock()?;
        Ok(guard.instances.get(&(tenant_id.clone(), instance_id.clone())).cloned())
    }

    fn save_instance(&self, instance: &InstanceRecord) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        if let Some(group_id) = &instance.configuration_id
            && !guard.groups.contains_key(&(instance.tenant_id.clone(), group_id.clone()))
        {
            return Err(StoreError::Invalid(format!(
                "instance {} references unknown group {group_id}",
                instance.id
            )));
        }
        guard
            .instances
            .insert((instance.tenant_id.clone(), instance.id.clone()), instance.clone());
        drop(guard);
        Ok(())
    }

    fn list_instances(&self, tenant_id: &TenantId) -> Result<Vec<InstanceRecord>, StoreError> {
        let guard = self.lock()?;
        Ok(guard
            .instances
            .iter()
            .filter(|((owner, _), _)| owner == tenant_id)
            .map(|(_, instance)| instance.clone())
            .collect())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared configuration store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedConfigurationStore {
    /// Inner store implementation.
    inner: Arc<dyn ConfigurationStore + Send + Sync>,
}

impl SharedConfigurationStore {
    /// Wraps a configuration store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl ConfigurationStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn ConfigurationStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl ConfigurationStore for SharedConfigurationStore {
    fn list_groups(&self, tenant_id: &TenantId) -> Result<Vec<ConfigurationGroup>, StoreError> {
        self.inner.list_groups(tenant_id)
    }

    fn load_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<Option<ConfigurationGroup>, StoreError> {
        self.inner.load_group(tenant_id, group_id)
    }

    fn save_group(&self, group: &ConfigurationGroup) -> Result<u64, StoreError> {
        self.inner.save_group(group)
    }

    fn delete_group(&self, tenant_id: &TenantId, group_id: &GroupId) -> Result<bool, StoreError> {
        self.inner.delete_group(tenant_id, group_id)
    }

    fn load_instance(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<Option<InstanceRecord>, StoreError> {
        self.inner.load_instance(tenant_id, instance_id)
    }

    fn save_instance(&self, instance: &InstanceRecord) -> Result<(), StoreError> {
        self.inner.save_instance(instance)
    }

    fn list_instances(&self, tenant_id: &TenantId) -> Result<Vec<InstanceRecord>, StoreError> {
        self.inner.list_instances(tenant_id)
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.inner.readiness()
    }
}
