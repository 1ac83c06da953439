//! Error types for the Custos vault
//!
//! Every rejection the vault can produce is a variant of [`VaultError`].
//! Validation always runs before mutation, so an error never leaves
//! partially-applied state behind.

use thiserror::Error;

use crate::types::account_id::AccountId;
use crate::types::transaction::TxId;

/// Result type alias using VaultError
pub type Result<T> = std::result::Result<T, VaultError>;

/// Unified error type for vault operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    // Construction errors
    #[error("Quorum is too small: {quorum} < {minimum}")]
    QuorumTooSmall { quorum: u32, minimum: u32 },

    #[error("Too few valid signers: {provided} provided, at least {minimum} required")]
    InsufficientSigners { provided: usize, minimum: usize },

    #[error("Null account cannot be a signer (position {position})")]
    NullSigner { position: usize },

    #[error("Signer {0} listed more than once")]
    DuplicateSigner(AccountId),

    #[error("Quorum greater than valid signers: {quorum} > {signers}")]
    QuorumExceedsSigners { quorum: u32, signers: usize },

    // Authorization errors
    #[error("Invalid signer: {0}")]
    InvalidSigner(AccountId),

    // Transfer proposal errors
    #[error("Can't send zero amount")]
    ZeroAmount,

    #[error("Null address found for {field}")]
    NullAddress { field: &'static str },

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: u128, available: u128 },

    // Approval errors
    #[error("Transaction {0} does not exist or is already completed")]
    UnknownOrCompletedTransaction(TxId),

    #[error("Can't sign twice: {approver} already approved")]
    DuplicateApproval { approver: AccountId },

    #[error("Quorum update to {pending} is already pending, cannot propose {proposed}")]
    ConflictingQuorumProposal { pending: u32, proposed: u32 },

    #[error("Quorum not reached for transaction {tx_id}: {approvals} of {required} approvals")]
    QuorumNotReached {
        tx_id: TxId,
        approvals: usize,
        required: u32,
    },

    // External ledger errors
    #[error("External ledger failure: {0}")]
    ExternalLedgerFailure(#[from] LedgerError),

    // Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Snapshot rejected: {0}")]
    CorruptSnapshot(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl VaultError {
    /// Whether resubmitting the same request later may succeed.
    ///
    /// Ledger and storage failures are transient from the vault's point of
    /// view; every other variant is a rejection of the request itself.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            VaultError::ExternalLedgerFailure(_) | VaultError::Storage(_)
        )
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            VaultError::QuorumTooSmall { .. } => "quorum_too_small",
            VaultError::InsufficientSigners { .. } => "insufficient_signers",
            VaultError::NullSigner { .. } => "null_signer",
            VaultError::DuplicateSigner(_) => "duplicate_signer",
            VaultError::QuorumExceedsSigners { .. } => "quorum_exceeds_signers",
            VaultError::InvalidSigner(_) => "invalid_signer",
            VaultError::ZeroAmount => "zero_amount",
            VaultError::NullAddress { .. } => "null_address",
            VaultError::InsufficientFunds { .. } => "insufficient_funds",
            VaultError::UnknownOrCompletedTransaction(_) => "unknown_or_completed_transaction",
            VaultError::DuplicateApproval { .. } => "duplicate_approval",
            VaultError::ConflictingQuorumProposal { .. } => "conflicting_quorum_proposal",
            VaultError::QuorumNotReached { .. } => "quorum_not_reached",
            VaultError::ExternalLedgerFailure(_) => "external_ledger_failure",
            VaultError::Storage(_) => "storage",
            VaultError::Serialization(_) => "serialization",
            VaultError::CorruptSnapshot(_) => "corrupt_snapshot",
            VaultError::Config(_) => "config",
        }
    }
}

/// Errors reported by an external asset ledger
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Asset ledger {0} is not registered with this vault")]
    UnknownLedger(AccountId),

    #[error("Ledger balance too low: required {required}, available {available}")]
    InsufficientBalance { required: u128, available: u128 },

    #[error("Transfer rejected: {0}")]
    Rejected(String),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::DuplicateApproval {
            approver: AccountId::new([7; 20]),
        };
        assert!(err.to_string().contains("Can't sign twice"));
        assert!(err.to_string().contains("0x0707"));
    }

    #[test]
    fn test_ledger_error_conversion() {
        let err: VaultError = LedgerError::Rejected("paused".to_string()).into();
        assert!(matches!(err, VaultError::ExternalLedgerFailure(_)));
        assert!(err.to_string().contains("paused"));
    }

    #[test]
    fn test_retriable_classification() {
        assert!(VaultError::Storage("disk full".to_string()).is_retriable());
        assert!(VaultError::ExternalLedgerFailure(LedgerError::Unavailable(
            "timeout".to_string()
        ))
        .is_retriable());
        assert!(!VaultError::ZeroAmount.is_retriable());
        assert!(!VaultError::InvalidSigner(AccountId::NULL).is_retriable());
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(VaultError::ZeroAmount.kind(), "zero_amount");
        assert_eq!(
            VaultError::UnknownOrCompletedTransaction(TxId(3)).kind(),
            "unknown_or_completed_transaction"
        );
    }
}
