//! Pending quorum update record

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::account_id::AccountId;

/// In-flight proposal to change the quorum
///
/// At most one exists per vault. It commits when its approvals reach the
/// quorum in force at that moment, not the proposed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingQuorumUpdate {
    /// Quorum value that takes effect on commit
    pub proposed_quorum: u32,

    /// Signers who approved the change
    pub approved_by: BTreeSet<AccountId>,

    /// Proposal timestamp (Unix milliseconds)
    pub proposed_at: i64,
}

impl PendingQuorumUpdate {
    /// Open a proposal carrying the proposer's approval
    pub fn new(proposed_quorum: u32, proposer: AccountId) -> Self {
        let mut approved_by = BTreeSet::new();
        approved_by.insert(proposer);

        Self {
            proposed_quorum,
            approved_by,
            proposed_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    #[inline]
    pub fn approval_count(&self) -> usize {
        self.approved_by.len()
    }

    pub fn has_approved(&self, signer: &AccountId) -> bool {
        self.approved_by.contains(signer)
    }

    /// Record an approval; returns false if `signer` had already approved
    pub fn record_approval(&mut self, signer: AccountId) -> bool {
        self.approved_by.insert(signer)
    }

    /// Check if approvals satisfy the current quorum
    pub fn reaches(&self, current_quorum: u32) -> bool {
        self.approval_count() >= current_quorum as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_update_accumulates() {
        let a = AccountId::new([1; 20]);
        let b = AccountId::new([2; 20]);

        let mut update = PendingQuorumUpdate::new(3, a);
        assert_eq!(update.approval_count(), 1);
        assert!(!update.reaches(2));

        assert!(!update.record_approval(a));
        assert!(update.record_approval(b));
        assert!(update.reaches(2));
        assert!(!update.reaches(3));
    }
}
