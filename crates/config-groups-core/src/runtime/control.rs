// crates/config-groups-core/src/runtime/control.rs
// ============================================================================
// Module: Config Groups Recording Instance Control
// Description: In-memory instance control that records deliveries.
// Purpose: Observe override deliveries in tests and dry runs.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`RecordingInstanceControl`] keeps every delivery it receives in order and
//! can be told to fail deliveries for specific instances. It never contacts a
//! real engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::InstanceId;
use crate::core::InstanceRecord;
use crate::core::OverrideDelivery;
use crate::interfaces::InstanceControl;
use crate::interfaces::InstanceControlError;

// ============================================================================
// SECTION: Recording Control
// ============================================================================

/// Delivery captured by [`RecordingInstanceControl`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelivery {
    /// Target instance.
    pub instance_id: InstanceId,
    /// Delivered payload.
    pub delivery: OverrideDelivery,
}

/// Instance control that records deliveries in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingInstanceControl {
    /// Successful deliveries in arrival order.
    deliveries: Arc<Mutex<Vec<RecordedDelivery>>>,
    /// Instances whose deliveries fail.
    unreachable: Arc<Mutex<BTreeSet<InstanceId>>>,
}

impl RecordingInstanceControl {
    /// Creates a control with no recorded deliveries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes deliveries to the instance fail until [`Self::restore`] is called.
    pub fn fail_instance(&self, instance_id: &InstanceId) {
        if let Ok(mut guard) = self.unreachable.lock() {
            guard.insert(instance_id.clone());
        }
    }

    /// Lets deliveries to the instance succeed again.
    pub fn restore(&self, instance_id: &InstanceId) {
        if let Ok(mut guard) = self.unreachable.lock() {
            guard.remove(instance_id);
        }
    }

    /// Returns all successful deliveries in arrival order.
    #[must_use]
    pub fn deliveries(&self) -> Vec<RecordedDelivery> {
        self.deliveries.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// Returns the most recent successful delivery to an instance.
    #[must_use]
    pub fn last_delivery(&self, instance_id: &InstanceId) -> Option<OverrideDelivery> {
        self.deliveries()
            .into_iter()
            .rev()
            .find(|entry| &entry.instance_id == instance_id)
            .map(|entry| entry.delivery)
    }
}

impl InstanceControl for RecordingInstanceControl {
    fn apply_overrides(
        &self,
        instance: &InstanceRecord,
        delivery: &OverrideDelivery,
    ) -> Result<(), InstanceControlError> {
        let blocked = self
            .unreachable
            .lock()
            .map_err(|_| {
                InstanceControlError::Unreachable(instance.id.clone(), "mutex poisoned".to_string())
            })?
            .contains(&instance.id);
        if blocked {
            return Err(InstanceControlError::Unreachable(
                instance.id.clone(),
                "agent did not respond".to_string(),
            ));
        }
        self.deliveries
            .lock()
            .map_err(|_| {
                InstanceControlError::Unreachable(instance.id.clone(), "mutex poisoned".to_string())
            })?
            .push(RecordedDelivery {
                instance_id: instance.id.clone(),
                delivery: delivery.clone(),
            });
        Ok(())
    }
}
