//! Approval bookkeeping for transfer proposals

use custos_common::{AccountId, Result, TxId, VaultError};
use serde::{Deserialize, Serialize};

use crate::state::VaultState;

/// Approval count after an accepted approval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalProgress {
    pub tx_id: TxId,
    pub approvals: usize,
    pub required: u32,
}

impl ApprovalProgress {
    /// Whether the ledger transfer should be attempted now
    pub fn ready(&self) -> bool {
        self.approvals >= self.required as usize
    }
}

/// Result of an accepted approval or execution request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ApprovalOutcome {
    /// Approval recorded, quorum not reached yet
    Pending {
        tx_id: TxId,
        approvals: usize,
        required: u32,
    },
    /// Quorum reached and the ledger transfer succeeded
    Executed { tx_id: TxId, approvals: usize },
}

/// Record `approver` on a pending transaction, in order:
/// existence and pending status, signer membership, duplicate approval.
pub fn record_approval(
    state: &mut VaultState,
    approver: AccountId,
    tx_id: TxId,
) -> Result<ApprovalProgress> {
    state.pending_transaction(tx_id)?;
    state.require_signer(&approver)?;

    let required = state.quorum;
    let tx = state.pending_transaction_mut(tx_id)?;
    if !tx.record_approval(approver) {
        return Err(VaultError::DuplicateApproval { approver });
    }

    Ok(ApprovalProgress {
        tx_id,
        approvals: tx.approval_count(),
        required,
    })
}

/// Check that a pending transaction may be executed by `caller` without a
/// new approval
pub fn check_executable(
    state: &VaultState,
    caller: AccountId,
    tx_id: TxId,
) -> Result<ApprovalProgress> {
    let tx = state.pending_transaction(tx_id)?;
    state.require_signer(&caller)?;

    let progress = ApprovalProgress {
        tx_id,
        approvals: tx.approval_count(),
        required: state.quorum,
    };

    if !progress.ready() {
        return Err(VaultError::QuorumNotReached {
            tx_id,
            approvals: progress.approvals,
            required: progress.required,
        });
    }

    Ok(progress)
}
