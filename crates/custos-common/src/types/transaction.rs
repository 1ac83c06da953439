//! Transaction - asset-transfer proposal awaiting quorum
//!
//! A transaction is created by a signer's transfer request, carries that
//! signer's approval from the start, and accumulates approvals from distinct
//! signers until it is executed. Completion is terminal.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::account_id::AccountId;

/// Sequential transaction identifier, starting at 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(pub u64);

impl TxId {
    /// The identifier following this one
    pub fn next(self) -> TxId {
        TxId(self.0 + 1)
    }
}

impl std::fmt::Display for TxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outbound transfer proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier
    pub id: TxId,

    /// Units to move, always positive
    pub amount: u128,

    /// Destination account on the asset ledger
    pub recipient: AccountId,

    /// Identifier of the asset ledger executing the transfer
    pub asset_ledger: AccountId,

    /// Signer who created the proposal
    pub proposer: AccountId,

    /// Signers who approved, proposer included
    pub approved_by: BTreeSet<AccountId>,

    /// Set once the ledger transfer succeeded; never reverts
    pub is_completed: bool,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Completion timestamp (Unix milliseconds)
    pub completed_at: Option<i64>,
}

impl Transaction {
    /// Create a pending transaction carrying the proposer's approval
    pub fn new(
        id: TxId,
        amount: u128,
        recipient: AccountId,
        asset_ledger: AccountId,
        proposer: AccountId,
    ) -> Self {
        let mut approved_by = BTreeSet::new();
        approved_by.insert(proposer);

        Self {
            id,
            amount,
            recipient,
            asset_ledger,
            proposer,
            approved_by,
            is_completed: false,
            created_at: chrono::Utc::now().timestamp_millis(),
            completed_at: None,
        }
    }

    /// Number of distinct approvals
    #[inline]
    pub fn approval_count(&self) -> usize {
        self.approved_by.len()
    }

    /// Check if `signer` already approved
    pub fn has_approved(&self, signer: &AccountId) -> bool {
        self.approved_by.contains(signer)
    }

    /// Record an approval; returns false if `signer` had already approved
    pub fn record_approval(&mut self, signer: AccountId) -> bool {
        self.approved_by.insert(signer)
    }

    /// Check if approvals satisfy `quorum`
    pub fn meets_quorum(&self, quorum: u32) -> bool {
        self.approval_count() >= quorum as usize
    }

    /// Check if the transaction still accepts approvals
    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.is_completed
    }

    /// Mark the transaction as executed
    pub fn mark_completed(&mut self) {
        debug_assert!(!self.is_completed, "transaction completed twice");
        self.is_completed = true;
        self.completed_at = Some(chrono::Utc::now().timestamp_millis());
    }
}

impl std::fmt::Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transaction(id={}, amount={}, to={}, approvals={}, completed={})",
            self.id,
            self.amount,
            self.recipient,
            self.approval_count(),
            self.is_completed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    #[test]
    fn test_new_transaction_has_proposer_approval() {
        let tx = Transaction::new(TxId(1), 100, account(9), account(8), account(1));
        assert_eq!(tx.approval_count(), 1);
        assert!(tx.has_approved(&account(1)));
        assert!(tx.is_pending());
        assert!(tx.completed_at.is_none());
    }

    #[test]
    fn test_record_approval_once() {
        let mut tx = Transaction::new(TxId(1), 100, account(9), account(8), account(1));
        assert!(tx.record_approval(account(2)));
        assert!(!tx.record_approval(account(2)));
        assert_eq!(tx.approval_count(), 2);
    }

    #[test]
    fn test_meets_quorum() {
        let mut tx = Transaction::new(TxId(1), 100, account(9), account(8), account(1));
        assert!(!tx.meets_quorum(2));
        tx.record_approval(account(2));
        assert!(tx.meets_quorum(2));
        assert!(!tx.meets_quorum(3));
    }

    #[test]
    fn test_mark_completed() {
        let mut tx = Transaction::new(TxId(4), 5, account(9), account(8), account(1));
        tx.mark_completed();
        assert!(tx.is_completed);
        assert!(!tx.is_pending());
        assert!(tx.completed_at.is_some());
    }

    #[test]
    fn test_tx_id_sequence() {
        assert_eq!(TxId::default().next(), TxId(1));
        assert_eq!(TxId(41).next().to_string(), "42");
    }
}
