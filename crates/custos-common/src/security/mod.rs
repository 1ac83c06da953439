//! Security module for Custos
//!
//! - Audit logging for authorization decisions and governance changes

pub mod audit;

pub use audit::{
    AuditCategory, AuditEvent, AuditLogger, AuditOutcome, AuditSeverity, AuditSink,
    ConsoleAuditSink, MemoryAuditSink,
};
