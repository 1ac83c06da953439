//! Vault state record and its persisted form
//!
//! [`VaultState`] is the single record every vault operation reads and
//! writes. [`VaultSnapshot`] is its serialized layout; converting a snapshot
//! back into state re-checks every invariant so a damaged or hand-edited
//! snapshot cannot resume an inconsistent vault.

use std::collections::{BTreeMap, BTreeSet};

use custos_common::{
    AccountId, PendingQuorumUpdate, Result, Transaction, TxId, VaultError, MIN_QUORUM,
};
use serde::{Deserialize, Serialize};

/// Current snapshot layout version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Engine state shared by governance and transfer operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultState {
    /// Distinct signer approvals required for any gated action
    pub quorum: u32,
    /// Authorized signers, creator included
    pub signers: BTreeSet<AccountId>,
    /// Identity that constructed the vault
    pub creator: AccountId,
    /// The vault's own account on asset ledgers
    pub vault_account: AccountId,
    /// Transactions by id
    pub transactions: BTreeMap<TxId, Transaction>,
    /// Highest transaction id issued
    pub tx_count: TxId,
    /// In-flight quorum change, if any
    pub pending_quorum_update: Option<PendingQuorumUpdate>,
}

impl VaultState {
    /// Fresh state with no transactions and no pending update
    pub fn new(
        quorum: u32,
        signers: BTreeSet<AccountId>,
        creator: AccountId,
        vault_account: AccountId,
    ) -> Self {
        Self {
            quorum,
            signers,
            creator,
            vault_account,
            transactions: BTreeMap::new(),
            tx_count: TxId::default(),
            pending_quorum_update: None,
        }
    }

    #[inline]
    pub fn is_signer(&self, account: &AccountId) -> bool {
        self.signers.contains(account)
    }

    /// Reject callers outside the signer set
    pub fn require_signer(&self, caller: &AccountId) -> Result<()> {
        if self.is_signer(caller) {
            Ok(())
        } else {
            Err(VaultError::InvalidSigner(*caller))
        }
    }

    /// Look up a transaction that still accepts approvals
    pub fn pending_transaction(&self, id: TxId) -> Result<&Transaction> {
        self.transactions
            .get(&id)
            .filter(|tx| tx.is_pending())
            .ok_or(VaultError::UnknownOrCompletedTransaction(id))
    }

    /// Mutable variant of [`VaultState::pending_transaction`]
    pub fn pending_transaction_mut(&mut self, id: TxId) -> Result<&mut Transaction> {
        self.transactions
            .get_mut(&id)
            .filter(|tx| tx.is_pending())
            .ok_or(VaultError::UnknownOrCompletedTransaction(id))
    }

    /// Number of transactions still awaiting execution
    pub fn pending_count(&self) -> usize {
        self.transactions.values().filter(|tx| tx.is_pending()).count()
    }

    /// Verify every structural invariant of the state record
    pub fn check_invariants(&self) -> Result<()> {
        let corrupt = |msg: String| Err(VaultError::CorruptSnapshot(msg));

        if self.quorum < MIN_QUORUM {
            return corrupt(format!("quorum {} below minimum {}", self.quorum, MIN_QUORUM));
        }
        if self.signers.len() < self.quorum as usize {
            return corrupt(format!(
                "{} signers cannot satisfy quorum {}",
                self.signers.len(),
                self.quorum
            ));
        }
        if self.signers.contains(&AccountId::NULL) {
            return corrupt("null account in signer set".to_string());
        }
        if !self.signers.contains(&self.creator) {
            return corrupt(format!("creator {} missing from signer set", self.creator));
        }
        if self.vault_account.is_null() {
            return corrupt("vault account is null".to_string());
        }

        for (id, tx) in &self.transactions {
            if *id != tx.id {
                return corrupt(format!("transaction keyed {} carries id {}", id, tx.id));
            }
            if tx.id.0 == 0 || tx.id > self.tx_count {
                return corrupt(format!("transaction id {} outside 1..={}", tx.id, self.tx_count));
            }
            if tx.amount == 0 || tx.recipient.is_null() || tx.asset_ledger.is_null() {
                return corrupt(format!("transaction {} is malformed", tx.id));
            }
            if tx.approved_by.is_empty() || !tx.approved_by.is_subset(&self.signers) {
                return corrupt(format!("transaction {} has approvals from non-signers", tx.id));
            }
        }

        if let Some(update) = &self.pending_quorum_update {
            if update.proposed_quorum < MIN_QUORUM
                || update.proposed_quorum as usize > self.signers.len()
            {
                return corrupt(format!(
                    "pending quorum {} outside valid range",
                    update.proposed_quorum
                ));
            }
            if update.approved_by.is_empty() || !update.approved_by.is_subset(&self.signers) {
                return corrupt("pending quorum update has approvals from non-signers".to_string());
            }
            if update.reaches(self.quorum) {
                return corrupt("pending quorum update already reached quorum".to_string());
            }
        }

        Ok(())
    }
}

/// Serialized vault state, sufficient to resume all in-flight approvals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSnapshot {
    pub version: u32,
    pub quorum: u32,
    pub signers: BTreeSet<AccountId>,
    pub creator: AccountId,
    pub vault_account: AccountId,
    pub tx_count: TxId,
    pub transactions: Vec<Transaction>,
    pub pending_quorum_update: Option<PendingQuorumUpdate>,
    /// Capture timestamp (Unix milliseconds)
    pub taken_at: i64,
}

impl From<&VaultState> for VaultSnapshot {
    fn from(state: &VaultState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            quorum: state.quorum,
            signers: state.signers.clone(),
            creator: state.creator,
            vault_account: state.vault_account,
            tx_count: state.tx_count,
            transactions: state.transactions.values().cloned().collect(),
            pending_quorum_update: state.pending_quorum_update.clone(),
            taken_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl TryFrom<VaultSnapshot> for VaultState {
    type Error = VaultError;

    fn try_from(snapshot: VaultSnapshot) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(VaultError::CorruptSnapshot(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let mut transactions = BTreeMap::new();
        for tx in snapshot.transactions {
            let id = tx.id;
            if transactions.insert(id, tx).is_some() {
                return Err(VaultError::CorruptSnapshot(format!(
                    "transaction {} appears twice",
                    id
                )));
            }
        }

        let state = VaultState {
            quorum: snapshot.quorum,
            signers: snapshot.signers,
            creator: snapshot.creator,
            vault_account: snapshot.vault_account,
            transactions,
            tx_count: snapshot.tx_count,
            pending_quorum_update: snapshot.pending_quorum_update,
        };
        state.check_invariants()?;
        Ok(state)
    }
}
