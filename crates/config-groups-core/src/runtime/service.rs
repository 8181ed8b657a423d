// crates/config-groups-core/src/runtime/service.rs
// ============================================================================
// Module: Config Groups Service
// Description: Configuration group lifecycle and override propagation.
// Purpose: Validate, persist, and push configuration groups to instances.
// Dependencies: crate::{audit, core, interfaces, views}, thiserror
// ============================================================================

//! ## Overview
//! [`ConfigurationService`] owns the rule table and drives every lifecycle
//! operation as validate, then mutate the store, then propagate. Validation
//! runs over the whole batch before anything is written, so a rejected
//! request leaves the group untouched.
//!
//! Edits and updates build a fresh item mapping and save it in one store
//! write guarded by the group's revision. Propagation then delivers the full
//! mapping to every attached instance and reports each outcome separately; a
//! failed delivery never hides the result of any other instance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::audit::AuditOperation;
use crate::audit::AuditOutcome;
use crate::audit::ConfigurationAuditEvent;
use crate::audit::ConfigurationAuditEventParams;
use crate::audit::ConfigurationAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::PropagationAuditEvent;
use crate::audit::PropagationAuditEventParams;
use crate::core::ConfigurationGroup;
use crate::core::GroupId;
use crate::core::InstanceId;
use crate::core::InstanceRecord;
use crate::core::InstanceStatus;
use crate::core::MAX_GROUP_DESCRIPTION_LENGTH;
use crate::core::MAX_GROUP_NAME_LENGTH;
use crate::core::OverrideDelivery;
use crate::core::ProposedValues;
use crate::core::RestartRequirement;
use crate::core::RuleTable;
use crate::core::TenantId;
use crate::interfaces::ConfigurationStore;
use crate::interfaces::InstanceControl;
use crate::interfaces::InstanceControlError;
use crate::interfaces::StoreError;
use crate::runtime::propagation::InstancePropagation;
use crate::runtime::propagation::PropagationOutcome;
use crate::runtime::propagation::PropagationReport;
use crate::runtime::propagation::classify_restart;
use crate::runtime::propagation::next_status;
use crate::runtime::propagation::replaced_keys;
use crate::runtime::validator::ValidationError;
use crate::runtime::validator::validate;
use crate::runtime::validator::validate_values;
use crate::views::ConfigurationSummaryView;
use crate::views::DetailedConfigurationView;
use crate::views::InstancesView;
use crate::views::ParameterView;
use crate::views::ParametersView;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Broad error classes for outer surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request was malformed or not allowed.
    Client,
    /// The addressed record does not exist.
    NotFound,
    /// The deployment or a backend failed.
    System,
}

/// Configuration service errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Proposed values were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Request fields were rejected.
    #[error("invalid request: {0}")]
    Invalid(String),
    /// Delete refused while instances are attached.
    #[error("configuration group {0} is in use by one or more instances")]
    GroupInUse(GroupId),
    /// Group does not exist for the tenant.
    #[error("configuration group not found: {0}")]
    GroupNotFound(GroupId),
    /// Instance does not exist for the tenant.
    #[error("instance not found: {0}")]
    InstanceNotFound(InstanceId),
    /// Parameter rule does not exist.
    #[error("configuration parameter not found: {0}")]
    ParameterNotFound(String),
    /// Store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Instance control failed.
    #[error(transparent)]
    InstanceControl(#[from] InstanceControlError),
}

impl ConfigurationError {
    /// Returns the error class.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(error) => {
                if error.is_client_error() {
                    ErrorClass::Client
                } else {
                    ErrorClass::System
                }
            }
            Self::Invalid(_) | Self::GroupInUse(_) => ErrorClass::Client,
            Self::GroupNotFound(_) | Self::InstanceNotFound(_) | Self::ParameterNotFound(_) => {
                ErrorClass::NotFound
            }
            Self::Store(_) | Self::InstanceControl(_) => ErrorClass::System,
        }
    }

    /// Returns a stable label for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(error) => error.kind(),
            Self::Invalid(_) => "invalid_request",
            Self::GroupInUse(_) => "group_in_use",
            Self::GroupNotFound(_) => "group_not_found",
            Self::InstanceNotFound(_) => "instance_not_found",
            Self::ParameterNotFound(_) => "parameter_not_found",
            Self::Store(error) => error.kind(),
            Self::InstanceControl(error) => error.kind(),
        }
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Request to create a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewGroup {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial overrides.
    pub values: ProposedValues,
}

/// Request to replace group fields. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupChanges {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement item set.
    pub values: Option<ProposedValues>,
}

/// Result of an edit or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupUpdate {
    /// Group after the change.
    pub group: DetailedConfigurationView,
    /// Delivery results for attached instances.
    pub propagation: PropagationReport,
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Configuration group lifecycle service.
pub struct ConfigurationService<S, C> {
    /// Parameter rules used for validation and restart classification.
    rules: RuleTable,
    /// Group and instance persistence.
    store: S,
    /// Override delivery to running instances.
    control: C,
    /// Audit sink.
    audit: Arc<dyn ConfigurationAuditSink>,
}

impl<S, C> ConfigurationService<S, C>
where
    S: ConfigurationStore,
    C: InstanceControl,
{
    /// Creates a service with a no-op audit sink.
    #[must_use]
    pub fn new(rules: RuleTable, store: S, control: C) -> Self {
        Self {
            rules,
            store,
            control,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn ConfigurationAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the rule table.
    #[must_use]
    pub const fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Returns the store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the instance control.
    #[must_use]
    pub const fn control(&self) -> &C {
        &self.control
    }

    // ------------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------------

    /// Lists every parameter rule.
    #[must_use]
    pub fn parameters(&self) -> ParametersView {
        ParametersView::from(&self.rules)
    }

    /// Returns one parameter rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ParameterNotFound`] for unknown names.
    pub fn parameter(&self, name: &str) -> Result<ParameterView, ConfigurationError> {
        self.rules
            .get(name)
            .map(ParameterView::from)
            .ok_or_else(|| ConfigurationError::ParameterNotFound(name.to_string()))
    }

    /// Validates proposed values without touching the store.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] in key order.
    pub fn validate(&self, values: &ProposedValues) -> Result<(), ValidationError> {
        validate(values, &self.rules)
    }

    // ------------------------------------------------------------------------
    // Group lifecycle
    // ------------------------------------------------------------------------

    /// Lists the tenant's groups.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Store`] when listing fails.
    pub fn list(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<ConfigurationSummaryView>, ConfigurationError> {
        let result = self
            .store
            .list_groups(tenant_id)
            .map(|groups| groups.iter().map(ConfigurationSummaryView::from).collect())
            .map_err(ConfigurationError::from);
        self.record(tenant_id, AuditOperation::List, None, None, Vec::new(), &result);
        result
    }

    /// Returns a group with its values and instances.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::GroupNotFound`] when the tenant has no
    /// such group.
    pub fn show(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<DetailedConfigurationView, ConfigurationError> {
        let result =
            self.load_group(tenant_id, group_id).map(|group| DetailedConfigurationView::from(&group));
        self.record(tenant_id, AuditOperation::Show, Some(group_id), None, Vec::new(), &result);
        result
    }

    /// Returns the instances attached to a group.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::GroupNotFound`] when the tenant has no
    /// such group.
    pub fn instances(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<InstancesView, ConfigurationError> {
        let result = self.load_group(tenant_id, group_id).map(|group| InstancesView::from(&group));
        self.record(tenant_id, AuditOperation::Instances, Some(group_id), None, Vec::new(), &result);
        result
    }

    /// Creates a group. Nothing is propagated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the request or values are invalid.
    pub fn create(
        &self,
        tenant_id: &TenantId,
        request: NewGroup,
    ) -> Result<DetailedConfigurationView, ConfigurationError> {
        let keys = request.values.keys().cloned().collect();
        let group_id = GroupId::generate();
        let result = self.create_group(tenant_id, &group_id, request);
        self.record(tenant_id, AuditOperation::Create, Some(&group_id), None, keys, &result);
        result
    }

    /// Merges values into a group and propagates the result.
    ///
    /// Submitted keys replace existing values; other keys are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the group is missing, the values are
    /// invalid, or the store rejects the write.
    pub fn edit(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
        values: &ProposedValues,
    ) -> Result<GroupUpdate, ConfigurationError> {
        let keys: Vec<String> = values.keys().cloned().collect();
        let result = self.edit_group(tenant_id, group_id, values);
        self.record(tenant_id, AuditOperation::Edit, Some(group_id), None, keys, &result);
        result
    }

    /// Replaces group fields and propagates when the item set was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the group is missing, the request is
    /// invalid, or the store rejects the write.
    pub fn update(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
        changes: GroupChanges,
    ) -> Result<GroupUpdate, ConfigurationError> {
        let keys = changes.values.as_ref().map(|values| values.keys().cloned().collect());
        let result = self.update_group(tenant_id, group_id, changes);
        self.record(
            tenant_id,
            AuditOperation::Update,
            Some(group_id),
            None,
            keys.unwrap_or_default(),
            &result,
        );
        result
    }

    /// Deletes a group that no instance uses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::GroupInUse`] while instances are attached.
    pub fn delete(&self, tenant_id: &TenantId, group_id: &GroupId) -> Result<(), ConfigurationError> {
        let result = self.delete_group(tenant_id, group_id);
        self.record(tenant_id, AuditOperation::Delete, Some(group_id), None, Vec::new(), &result);
        result
    }

    // ------------------------------------------------------------------------
    // Instances
    // ------------------------------------------------------------------------

    /// Registers an instance with no group assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Invalid`] when the record already names a
    /// group or the instance identifier is already registered for the tenant.
    pub fn register_instance(&self, instance: &InstanceRecord) -> Result<(), ConfigurationError> {
        let result = self.insert_instance(instance);
        self.record(
            &instance.tenant_id,
            AuditOperation::Register,
            None,
            Some(&instance.id),
            Vec::new(),
            &result,
        );
        result
    }

    /// Lists the tenant's instances.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Store`] when listing fails.
    pub fn list_instances(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<InstanceRecord>, ConfigurationError> {
        Ok(self.store.list_instances(tenant_id)?)
    }

    /// Returns one instance record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InstanceNotFound`] when the tenant has no
    /// such instance.
    pub fn instance(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<InstanceRecord, ConfigurationError> {
        self.store
            .load_instance(tenant_id, instance_id)?
            .ok_or_else(|| ConfigurationError::InstanceNotFound(instance_id.clone()))
    }

    /// Assigns a group to an instance, or unassigns when `group_id` is `None`.
    ///
    /// The group's full item set is delivered and classified over every
    /// delivered key. Returns `None` when unassigning an instance that has no
    /// group.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the instance or group is missing or
    /// delivery fails; the association is unchanged on error.
    pub fn assign(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
        group_id: Option<&GroupId>,
    ) -> Result<Option<InstancePropagation>, ConfigurationError> {
        let Some(group_id) = group_id else {
            return self.unassign(tenant_id, instance_id);
        };
        let result = self.assign_group(tenant_id, instance_id, group_id).map(Some);
        self.record(
            tenant_id,
            AuditOperation::Assign,
            Some(group_id),
            Some(instance_id),
            Vec::new(),
            &result,
        );
        result
    }

    /// Clears an instance's group and delivers an empty override mapping.
    ///
    /// Returns `None` without delivering anything when no group is assigned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the instance is missing or delivery
    /// fails; the association is unchanged on error.
    pub fn unassign(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<Option<InstancePropagation>, ConfigurationError> {
        let mut group_id = None;
        let result = self.instance(tenant_id, instance_id).and_then(|instance| {
            group_id.clone_from(&instance.configuration_id);
            if instance.configuration_id.is_none() {
                return Ok(None);
            }
            self.deliver(instance, None, &OverrideDelivery::clear()).map(Some)
        });
        self.record(
            tenant_id,
            AuditOperation::Unassign,
            group_id.as_ref(),
            Some(instance_id),
            Vec::new(),
            &result,
        );
        result
    }

    /// Marks an instance active again after its engine restarted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InstanceNotFound`] when the tenant has no
    /// such instance.
    pub fn restart(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
    ) -> Result<InstanceRecord, ConfigurationError> {
        let result = self.instance(tenant_id, instance_id).and_then(|mut instance| {
            instance.status = InstanceStatus::Active;
            self.store.save_instance(&instance)?;
            Ok(instance)
        });
        self.record(
            tenant_id,
            AuditOperation::Restart,
            None,
            Some(instance_id),
            Vec::new(),
            &result,
        );
        result
    }

    // ------------------------------------------------------------------------
    // Operation bodies
    // ------------------------------------------------------------------------

    /// Loads a tenant-scoped group.
    fn load_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
    ) -> Result<ConfigurationGroup, ConfigurationError> {
        self.store
            .load_group(tenant_id, group_id)?
            .ok_or_else(|| ConfigurationError::GroupNotFound(group_id.clone()))
    }

    /// Validates and stores a new group.
    fn create_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
        request: NewGroup,
    ) -> Result<DetailedConfigurationView, ConfigurationError> {
        check_name(&request.name)?;
        check_description(request.description.as_deref())?;
        let items = validate_values(&request.values, &self.rules)?;
        let mut group = ConfigurationGroup {
            id: group_id.clone(),
            tenant_id: tenant_id.clone(),
            name: request.name,
            description: request.description,
            items,
            instances: Vec::new(),
            revision: 0,
        };
        group.revision = self.store.save_group(&group)?;
        Ok(DetailedConfigurationView::from(&group))
    }

    /// Merges values into a group, saves, and propagates.
    fn edit_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
        values: &ProposedValues,
    ) -> Result<GroupUpdate, ConfigurationError> {
        let mut group = self.load_group(tenant_id, group_id)?;
        let accepted = validate_values(values, &self.rules)?;
        let mut items = group.items.clone();
        items.extend(accepted);
        group.items = items;
        group.revision = self.store.save_group(&group)?;
        let restart = classify_restart(values.keys().map(String::as_str), &self.rules);
        let propagation = self.propagate(&group, restart);
        Ok(GroupUpdate {
            group: DetailedConfigurationView::from(&group),
            propagation,
        })
    }

    /// Replaces group fields, saves, and propagates a replaced item set.
    fn update_group(
        &self,
        tenant_id: &TenantId,
        group_id: &GroupId,
        changes: GroupChanges,
    ) -> Result<GroupUpdate, ConfigurationError> {
        let mut group = self.load_group(tenant_id, group_id)?;
        if let Some(name) = &changes.name {
            check_name(name)?;
        }
        check_description(changes.description.as_deref())?;
        let items = changes.values.as_ref().map(|values| validate_values(values, &self.rules));
        let items = items.transpose()?;
        if let Some(name) = changes.name {
            group.name = name;
        }
        if let Some(description) = changes.description {
            group.description = Some(description);
        }
        let restart = items.map(|items| {
            let touched = replaced_keys(&group.items, &items);
            group.items = items;
            classify_restart(touched.iter().map(String::as_str), &self.rules)
        });
        group.revision = self.store.save_group(&group)?;
        let propagation = match restart {
            Some(restart) => self.propagate(&group, restart),
            None => PropagationReport::new(group.id.clone()),
        };
        Ok(GroupUpdate {
            group: DetailedConfigurationView::from(&group),
            propagation,
        })
    }

    /// Stores a new, unassigned instance record.
    fn insert_instance(&self, instance: &InstanceRecord) -> Result<(), ConfigurationError> {
        if instance.configuration_id.is_some() {
            return Err(ConfigurationError::Invalid(
                "instances are registered without a configuration group".to_string(),
            ));
        }
        if self.store.load_instance(&instance.tenant_id, &instance.id)?.is_some() {
            return Err(ConfigurationError::Invalid(format!(
                "instance {} is already registered",
                instance.id
            )));
        }
        self.store.save_instance(instance)?;
        Ok(())
    }

    /// Deletes an unused group.
    fn delete_group(&self, tenant_id: &TenantId, group_id: &GroupId) -> Result<(), ConfigurationError> {
        let group = self.load_group(tenant_id, group_id)?;
        if group.is_in_use() {
            return Err(ConfigurationError::GroupInUse(group_id.clone()));
        }
        if !self.store.delete_group(tenant_id, group_id)? {
            return Err(ConfigurationError::GroupNotFound(group_id.clone()));
        }
        Ok(())
    }

    /// Delivers a group's items to one instance and records the association.
    fn assign_group(
        &self,
        tenant_id: &TenantId,
        instance_id: &InstanceId,
        group_id: &GroupId,
    ) -> Result<InstancePropagation, ConfigurationError> {
        let instance = self.instance(tenant_id, instance_id)?;
        let group = self.load_group(tenant_id, group_id)?;
        let delivery = OverrideDelivery {
            restart: classify_restart(group.items.keys().map(String::as_str), &self.rules),
            overrides: group.items,
        };
        self.deliver(instance, Some(group.id), &delivery)
    }

    // ------------------------------------------------------------------------
    // Propagation
    // ------------------------------------------------------------------------

    /// Delivers overrides to one instance and stores its association and status.
    fn deliver(
        &self,
        instance: InstanceRecord,
        configuration_id: Option<GroupId>,
        delivery: &OverrideDelivery,
    ) -> Result<InstancePropagation, ConfigurationError> {
        let audit_group = configuration_id.clone().or_else(|| instance.configuration_id.clone());
        let outcome = self.apply(&instance, configuration_id, delivery);
        let (status, error_kind) = match &outcome {
            Ok(updated) => (updated.status, None),
            Err(error) => (instance.status, Some(error.kind().to_string())),
        };
        self.audit.record_propagation(&PropagationAuditEvent::new(PropagationAuditEventParams {
            tenant_id: instance.tenant_id.to_string(),
            group_id: audit_group.map(|id| id.to_string()),
            instance_id: instance.id.to_string(),
            override_count: delivery.overrides.len(),
            restart: delivery.restart,
            status,
            outcome: if outcome.is_ok() { AuditOutcome::Success } else { AuditOutcome::Failure },
            error_kind,
        }));
        outcome.map(|updated| InstancePropagation {
            instance_id: updated.id,
            restart: delivery.restart,
            status: updated.status,
            outcome: PropagationOutcome::Delivered,
        })
    }

    /// Applies overrides, then saves the instance with its new association.
    fn apply(
        &self,
        instance: &InstanceRecord,
        configuration_id: Option<GroupId>,
        delivery: &OverrideDelivery,
    ) -> Result<InstanceRecord, ConfigurationError> {
        self.control.apply_overrides(instance, delivery)?;
        let mut updated = instance.clone();
        updated.configuration_id = configuration_id;
        updated.status = next_status(instance.status, delivery.restart);
        self.store.save_instance(&updated)?;
        Ok(updated)
    }

    /// Delivers a group's items to every attached instance.
    fn propagate(&self, group: &ConfigurationGroup, restart: RestartRequirement) -> PropagationReport {
        let delivery = OverrideDelivery {
            overrides: group.items.clone(),
            restart,
        };
        let mut report = PropagationReport::new(group.id.clone());
        for reference in &group.instances {
            let entry = match self.store.load_instance(&group.tenant_id, &reference.id) {
                Ok(Some(instance)) => {
                    let status = instance.status;
                    self.deliver(instance, Some(group.id.clone()), &delivery)
                        .unwrap_or_else(|error| failed(reference.id.clone(), restart, status, &error))
                }
                Ok(None) => failed(
                    reference.id.clone(),
                    restart,
                    InstanceStatus::Active,
                    &ConfigurationError::InstanceNotFound(reference.id.clone()),
                ),
                Err(error) => failed(
                    reference.id.clone(),
                    restart,
                    InstanceStatus::Active,
                    &ConfigurationError::Store(error),
                ),
            };
            report.instances.push(entry);
        }
        report
    }

    // ------------------------------------------------------------------------
    // Audit
    // ------------------------------------------------------------------------

    /// Records a lifecycle audit event for an operation result.
    fn record<T>(
        &self,
        tenant_id: &TenantId,
        operation: AuditOperation,
        group_id: Option<&GroupId>,
        instance_id: Option<&InstanceId>,
        keys: Vec<String>,
        result: &Result<T, ConfigurationError>,
    ) {
        let (outcome, error_kind) = match result {
            Ok(_) => (AuditOutcome::Success, None),
            Err(error) => (AuditOutcome::Failure, Some(error.kind())),
        };
        self.audit.record(&ConfigurationAuditEvent::new(ConfigurationAuditEventParams {
            tenant_id: tenant_id.to_string(),
            operation,
            group_id: group_id.map(ToString::to_string),
            instance_id: instance_id.map(ToString::to_string),
            keys,
            outcome,
            error_kind,
        }));
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a failed propagation entry.
fn failed(
    instance_id: InstanceId,
    restart: RestartRequirement,
    status: InstanceStatus,
    error: &ConfigurationError,
) -> InstancePropagation {
    InstancePropagation {
        instance_id,
        restart,
        status,
        outcome: PropagationOutcome::Failed {
            kind: error.kind().to_string(),
            message: error.to_string(),
        },
    }
}

/// Checks a group name against length limits.
fn check_name(name: &str) -> Result<(), ConfigurationError> {
    if name.trim().is_empty() {
        return Err(ConfigurationError::Invalid("group name must be non-empty".to_string()));
    }
    if name.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(ConfigurationError::Invalid(format!(
            "group name exceeds {MAX_GROUP_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Checks a group description against length limits.
fn check_description(description: Option<&str>) -> Result<(), ConfigurationError> {
    match description {
        Some(text) if text.chars().count() > MAX_GROUP_DESCRIPTION_LENGTH => {
            Err(ConfigurationError::Invalid(format!(
                "group description exceeds {MAX_GROUP_DESCRIPTION_LENGTH} characters"
            )))
        }
        _ => Ok(()),
    }
}
