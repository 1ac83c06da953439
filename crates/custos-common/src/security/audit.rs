//! Security Audit Logging
//!
//! Records security-relevant vault events:
//! - Authorization denials (non-signers, mismatched approvers)
//! - Transfer proposals and approvals
//! - Ledger executions and their failures
//! - Quorum changes

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::types::account_id::AccountId;

/// Audit event severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuditSeverity {
    /// Informational - normal operation
    Info,
    /// Warning - rejected request or potential issue
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - security incident
    Critical,
}

impl std::fmt::Display for AuditSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditSeverity::Info => write!(f, "INFO"),
            AuditSeverity::Warning => write!(f, "WARN"),
            AuditSeverity::Error => write!(f, "ERROR"),
            AuditSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Audit event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditCategory {
    /// Signer authentication decisions
    Authorization,
    /// Quorum and signer-set governance
    Governance,
    /// Transfer proposals
    Proposal,
    /// Approvals on transfers
    Approval,
    /// Ledger executions
    Execution,
    /// Vault lifecycle (construction, restore)
    System,
}

impl std::fmt::Display for AuditCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditCategory::Authorization => write!(f, "AUTHZ"),
            AuditCategory::Governance => write!(f, "GOV"),
            AuditCategory::Proposal => write!(f, "PROPOSAL"),
            AuditCategory::Approval => write!(f, "APPROVAL"),
            AuditCategory::Execution => write!(f, "EXEC"),
            AuditCategory::System => write!(f, "SYSTEM"),
        }
    }
}

/// Audit outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Success,
    Failure,
}

/// Audit event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID
    pub event_id: String,

    /// Timestamp (Unix millis)
    pub timestamp: i64,

    pub severity: AuditSeverity,

    pub category: AuditCategory,

    /// Event action (e.g., "transfer", "approve", "update_quorum")
    pub action: String,

    pub outcome: AuditOutcome,

    /// Identity that performed the action
    pub actor: Option<AccountId>,

    /// Target resource (e.g., "tx/3", "quorum")
    pub resource: Option<String>,

    /// Additional details
    pub details: HashMap<String, String>,
}

impl AuditEvent {
    /// Create a new audit event
    pub fn new(category: AuditCategory, action: &str, outcome: AuditOutcome) -> Self {
        Self {
            event_id: uuid::Uuid::now_v7().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            severity: match outcome {
                AuditOutcome::Success => AuditSeverity::Info,
                AuditOutcome::Failure => AuditSeverity::Warning,
            },
            category,
            action: action.to_string(),
            outcome,
            actor: None,
            resource: None,
            details: HashMap::new(),
        }
    }

    /// Set severity
    pub fn with_severity(mut self, severity: AuditSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Set actor
    pub fn with_actor(mut self, actor: AccountId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Set resource
    pub fn with_resource(mut self, resource: &str) -> Self {
        self.resource = Some(resource.to_string());
        self
    }

    /// Add detail
    pub fn with_detail(mut self, key: &str, value: impl ToString) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Audit log sink
pub trait AuditSink: Send + Sync {
    /// Write an audit event
    fn write(&self, event: &AuditEvent);

    /// Flush pending events
    fn flush(&self);
}

/// Console audit sink, writes through `tracing`
pub struct ConsoleAuditSink;

impl AuditSink for ConsoleAuditSink {
    fn write(&self, event: &AuditEvent) {
        let actor = event.actor.map(|a| a.to_string());
        let log_line = format!(
            "[{}] {} {} {} - actor={} resource={} outcome={:?}",
            event.severity,
            event.category,
            event.action,
            event.event_id,
            actor.as_deref().unwrap_or("-"),
            event.resource.as_deref().unwrap_or("-"),
            event.outcome,
        );

        match event.severity {
            AuditSeverity::Info => info!("{}", log_line),
            AuditSeverity::Warning => warn!("{}", log_line),
            AuditSeverity::Error => error!("{}", log_line),
            AuditSeverity::Critical => error!("CRITICAL: {}", log_line),
        }
    }

    fn flush(&self) {
        // Console logging is immediate
    }
}

/// In-memory audit sink
///
/// Clones share the same buffer, so a handle kept outside the logger can
/// inspect what was recorded.
#[derive(Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<RwLock<Vec<AuditEvent>>>,
    max_events: Option<usize>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_events`, dropping the oldest first
    pub fn with_capacity_limit(max_events: usize) -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            max_events: Some(max_events),
        }
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Events of one category
    pub fn events_in(&self, category: AuditCategory) -> Vec<AuditEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl AuditSink for MemoryAuditSink {
    fn write(&self, event: &AuditEvent) {
        let mut events = self.events.write();
        events.push(event.clone());

        if let Some(max) = self.max_events {
            if events.len() > max {
                let excess = events.len() - max;
                events.drain(..excess);
            }
        }
    }

    fn flush(&self) {}
}

/// Audit logger
pub struct AuditLogger {
    sinks: Vec<Box<dyn AuditSink>>,
    /// Minimum severity to log
    min_severity: AuditSeverity,
    /// Categories to log (empty = all)
    enabled_categories: Vec<AuditCategory>,
}

impl AuditLogger {
    /// Create a new audit logger writing to the console
    pub fn new() -> Self {
        Self {
            sinks: vec![Box::new(ConsoleAuditSink)],
            min_severity: AuditSeverity::Info,
            enabled_categories: vec![],
        }
    }

    /// Create a logger with no sinks
    pub fn silent() -> Self {
        Self {
            sinks: vec![],
            min_severity: AuditSeverity::Info,
            enabled_categories: vec![],
        }
    }

    /// Add a sink
    pub fn add_sink(&mut self, sink: Box<dyn AuditSink>) {
        self.sinks.push(sink);
    }

    /// Add a sink, builder style
    pub fn with_sink(mut self, sink: Box<dyn AuditSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Set minimum severity
    pub fn set_min_severity(&mut self, severity: AuditSeverity) {
        self.min_severity = severity;
    }

    /// Set enabled categories
    pub fn set_enabled_categories(&mut self, categories: Vec<AuditCategory>) {
        self.enabled_categories = categories;
    }

    /// Log an audit event
    pub fn log(&self, event: AuditEvent) {
        if event.severity < self.min_severity {
            return;
        }

        if !self.enabled_categories.is_empty()
            && !self.enabled_categories.contains(&event.category)
        {
            return;
        }

        for sink in &self.sinks {
            sink.write(&event);
        }
    }

    /// Log a rejected request from an identity outside the signer set
    pub fn log_authorization_denied(&self, actor: AccountId, operation: &str, reason: &str) {
        let event = AuditEvent::new(AuditCategory::Authorization, operation, AuditOutcome::Failure)
            .with_actor(actor)
            .with_detail("reason", reason);

        self.log(event);
    }

    /// Log a new transfer proposal
    pub fn log_proposal(&self, actor: AccountId, tx_id: u64, amount: u128, recipient: AccountId) {
        let event = AuditEvent::new(AuditCategory::Proposal, "transfer", AuditOutcome::Success)
            .with_actor(actor)
            .with_resource(&format!("tx/{}", tx_id))
            .with_detail("amount", amount)
            .with_detail("recipient", recipient);

        self.log(event);
    }

    /// Log an approval on a transfer
    pub fn log_approval(&self, actor: AccountId, tx_id: u64, approvals: usize, required: u32) {
        let event = AuditEvent::new(AuditCategory::Approval, "approve", AuditOutcome::Success)
            .with_actor(actor)
            .with_resource(&format!("tx/{}", tx_id))
            .with_detail("approvals", approvals)
            .with_detail("required", required);

        self.log(event);
    }

    /// Log a ledger execution attempt
    pub fn log_execution(&self, actor: AccountId, tx_id: u64, success: bool, detail: Option<&str>) {
        let outcome = if success {
            AuditOutcome::Success
        } else {
            AuditOutcome::Failure
        };

        let mut event = AuditEvent::new(AuditCategory::Execution, "execute", outcome)
            .with_actor(actor)
            .with_resource(&format!("tx/{}", tx_id));

        if !success {
            event = event.with_severity(AuditSeverity::Error);
        }
        if let Some(d) = detail {
            event = event.with_detail("detail", d);
        }

        self.log(event);
    }

    /// Log a committed quorum change
    pub fn log_quorum_change(&self, actor: AccountId, old_value: u32, new_value: u32) {
        let event = AuditEvent::new(AuditCategory::Governance, "quorum_change", AuditOutcome::Success)
            .with_actor(actor)
            .with_resource("quorum")
            .with_detail("old_value", old_value)
            .with_detail("new_value", new_value);

        self.log(event);
    }

    /// Log a vault lifecycle event
    pub fn log_system(&self, action: &str, details: HashMap<String, String>) {
        let mut event = AuditEvent::new(AuditCategory::System, action, AuditOutcome::Success);
        event.details = details;
        self.log(event);
    }

    /// Flush all sinks
    pub fn flush(&self) {
        for sink in &self.sinks {
            sink.flush();
        }
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> AccountId {
        AccountId::new([3; 20])
    }

    #[test]
    fn test_audit_event_creation() {
        let event = AuditEvent::new(AuditCategory::Approval, "approve", AuditOutcome::Success)
            .with_actor(actor())
            .with_resource("tx/1")
            .with_detail("approvals", 2);

        assert_eq!(event.category, AuditCategory::Approval);
        assert_eq!(event.severity, AuditSeverity::Info);
        assert_eq!(event.actor, Some(actor()));
        assert_eq!(event.details.get("approvals"), Some(&"2".to_string()));
    }

    #[test]
    fn test_audit_event_json() {
        let event = AuditEvent::new(AuditCategory::Authorization, "transfer", AuditOutcome::Failure)
            .with_resource("tx/9");

        let json = event.to_json();
        assert!(json.contains("Authorization"));
        assert!(json.contains("tx/9"));
    }

    #[test]
    fn test_memory_sink_records_through_logger() {
        let sink = MemoryAuditSink::new();
        let logger = AuditLogger::silent().with_sink(Box::new(sink.clone()));

        logger.log_authorization_denied(actor(), "approve_tx", "not a signer");
        logger.log_quorum_change(actor(), 2, 3);

        assert_eq!(sink.len(), 2);
        let denials = sink.events_in(AuditCategory::Authorization);
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].outcome, AuditOutcome::Failure);
    }

    #[test]
    fn test_severity_filter() {
        let sink = MemoryAuditSink::new();
        let mut logger = AuditLogger::silent().with_sink(Box::new(sink.clone()));
        logger.set_min_severity(AuditSeverity::Warning);

        logger.log_approval(actor(), 1, 1, 2);
        logger.log_execution(actor(), 1, false, Some("ledger paused"));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, AuditSeverity::Error);
    }

    #[test]
    fn test_capacity_limit() {
        let sink = MemoryAuditSink::with_capacity_limit(2);
        let logger = AuditLogger::silent().with_sink(Box::new(sink.clone()));

        for tx in 1..=3 {
            logger.log_approval(actor(), tx, 1, 2);
        }

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].resource.as_deref(), Some("tx/2"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(AuditSeverity::Info < AuditSeverity::Warning);
        assert!(AuditSeverity::Warning < AuditSeverity::Error);
        assert!(AuditSeverity::Error < AuditSeverity::Critical);
    }
}
