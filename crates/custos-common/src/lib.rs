//! # Custos Common
//!
//! Shared identifiers, records, errors, and audit logging for the Custos
//! quorum-gated vault.
//!
//! ## Core Types
//!
//! - [`AccountId`]: fixed-length opaque account identifier with a reserved null value
//! - [`Transaction`]: an asset-transfer proposal and its approvals
//! - [`PendingQuorumUpdate`]: an in-flight proposal to change the quorum
//!
//! ## Security
//!
//! - [`security::audit`]: Audit logging for authorization and governance events

pub mod error;
pub mod security;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{LedgerError, Result, VaultError};
pub use types::{
    account_id::{AccountId, AccountIdError, ACCOUNT_ID_LEN},
    quorum_update::PendingQuorumUpdate,
    transaction::{Transaction, TxId},
};

/// Custos version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest quorum a vault may be constructed with or updated to
pub const MIN_QUORUM: u32 = 2;

/// Smallest number of candidate signers accepted at construction
pub const MIN_CANDIDATE_SIGNERS: usize = 2;
