//! Transfer module - proposals, approvals, and execution readiness
//!
//! Per transaction: `Pending --(approvals reach quorum, ledger ok)--> Completed`.
//! Completion is terminal.

pub mod approval;
pub mod proposal;

pub use approval::{check_executable, record_approval, ApprovalOutcome, ApprovalProgress};
pub use proposal::{record_proposal, validate_request, TransferRequest};
