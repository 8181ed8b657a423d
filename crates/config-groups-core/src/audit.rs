// crates/config-groups-core/src/audit.rs
// ============================================================================
// Module: Config Groups Audit Logging
// Description: Structured audit events for configuration lifecycle operations.
// Purpose: Emit JSON-line audit records without a logging framework dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every lifecycle operation records one [`ConfigurationAuditEvent`], and every
//! per-instance override delivery records one [`PropagationAuditEvent`].
//! Events never carry parameter values, only keys and identifiers, so audit
//! logs can be shipped without redaction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::InstanceStatus;
use crate::core::RestartRequirement;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Lifecycle operation recorded in an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    /// Group listing.
    List,
    /// Group detail lookup.
    Show,
    /// Group instance listing.
    Instances,
    /// Group creation.
    Create,
    /// Merge edit.
    Edit,
    /// Replace update.
    Update,
    /// Group deletion.
    Delete,
    /// Instance registration.
    Register,
    /// Instance assignment.
    Assign,
    /// Instance unassignment.
    Unassign,
    /// Instance restart acknowledgement.
    Restart,
}

/// Operation outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Operation completed.
    Success,
    /// Operation failed.
    Failure,
}

/// Lifecycle audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tenant identifier.
    pub tenant_id: String,
    /// Operation performed.
    pub operation: AuditOperation,
    /// Group identifier when known.
    pub group_id: Option<String>,
    /// Instance identifier when the operation targets an instance.
    pub instance_id: Option<String>,
    /// Parameter keys submitted with the request.
    pub keys: Vec<String>,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a lifecycle audit event.
pub struct ConfigurationAuditEventParams {
    /// Tenant identifier.
    pub tenant_id: String,
    /// Operation performed.
    pub operation: AuditOperation,
    /// Group identifier when known.
    pub group_id: Option<String>,
    /// Instance identifier when the operation targets an instance.
    pub instance_id: Option<String>,
    /// Parameter keys submitted with the request.
    pub keys: Vec<String>,
    /// Operation outcome.
    pub outcome: AuditOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

/// Per-instance propagation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct PropagationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tenant identifier.
    pub tenant_id: String,
    /// Group identifier, absent when overrides were cleared.
    pub group_id: Option<String>,
    /// Instance identifier.
    pub instance_id: String,
    /// Number of overrides delivered.
    pub override_count: usize,
    /// Restart classification.
    pub restart: RestartRequirement,
    /// Instance status after the attempt.
    pub status: InstanceStatus,
    /// Delivery outcome.
    pub outcome: AuditOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<String>,
}

/// Inputs required to construct a propagation audit event.
pub struct PropagationAuditEventParams {
    /// Tenant identifier.
    pub tenant_id: String,
    /// Group identifier, absent when overrides were cleared.
    pub group_id: Option<String>,
    /// Instance identifier.
    pub instance_id: String,
    /// Number of overrides delivered.
    pub override_count: usize,
    /// Restart classification.
    pub restart: RestartRequirement,
    /// Instance status after the attempt.
    pub status: InstanceStatus,
    /// Delivery outcome.
    pub outcome: AuditOutcome,
    /// Normalized error kind label.
    pub error_kind: Option<String>,
}

impl ConfigurationAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ConfigurationAuditEventParams) -> Self {
        Self {
            event: "configuration_operation",
            timestamp_ms: now_ms(),
            tenant_id: params.tenant_id,
            operation: params.operation,
            group_id: params.group_id,
            instance_id: params.instance_id,
            keys: params.keys,
            outcome: params.outcome,
            error_kind: params.error_kind,
        }
    }
}

impl PropagationAuditEvent {
    /// Creates a new propagation audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: PropagationAuditEventParams) -> Self {
        Self {
            event: "override_propagation",
            timestamp_ms: now_ms(),
            tenant_id: params.tenant_id,
            group_id: params.group_id,
            instance_id: params.instance_id,
            override_count: params.override_count,
            restart: params.restart,
            status: params.status,
            outcome: params.outcome,
            error_kind: params.error_kind,
        }
    }
}

/// Returns the current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for configuration events.
pub trait ConfigurationAuditSink: Send + Sync {
    /// Record a lifecycle audit event.
    fn record(&self, event: &ConfigurationAuditEvent);

    /// Record a propagation audit event.
    fn record_propagation(&self, _event: &PropagationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ConfigurationAuditSink for StderrAuditSink {
    fn record(&self, event: &ConfigurationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_propagation(&self, event: &PropagationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes and appends one line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ConfigurationAuditSink for FileAuditSink {
    fn record(&self, event: &ConfigurationAuditEvent) {
        self.append(event);
    }

    fn record_propagation(&self, event: &PropagationAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ConfigurationAuditSink for NoopAuditSink {
    fn record(&self, _event: &ConfigurationAuditEvent) {}

    fn record_propagation(&self, _event: &PropagationAuditEvent) {}
}
