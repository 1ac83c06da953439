//! Multisig vault engine
//!
//! [`MultisigVault`] ties the governance and transfer state machines to the
//! outside world: asset ledgers, the snapshot store, audit, metrics and the
//! event channel.
//!
//! Every operation locks the state for its whole duration and works on a
//! scratch copy. The copy replaces the live state only once validation, the
//! ledger call and the snapshot save have all succeeded, so a rejected
//! request never leaves a trace. One exception is deliberate: when a
//! transfer reaches quorum but the ledger refuses it, the approval that
//! triggered the attempt is kept and the transaction stays pending.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use custos_common::security::{AuditCategory, AuditEvent, AuditLogger, AuditOutcome};
use custos_common::{AccountId, PendingQuorumUpdate, Result, Transaction, TxId, VaultError};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, instrument, warn};

use crate::events::{EventPublisher, VaultEvent};
use crate::governance::{build_signer_set, QuorumManager, QuorumUpdateOutcome};
use crate::ledger::{AssetLedger, LedgerRegistry};
use crate::metrics::VaultMetrics;
use crate::state::{VaultSnapshot, VaultState};
use crate::storage::SnapshotStore;
use crate::transfer::{
    check_executable, record_approval, record_proposal, validate_request, ApprovalOutcome,
    ApprovalProgress, TransferRequest,
};

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Read-only view of the vault's governance state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSummary {
    pub quorum: u32,
    pub signers: Vec<AccountId>,
    pub creator: AccountId,
    pub vault_account: AccountId,
    pub tx_count: TxId,
    pub pending_transactions: usize,
    pub pending_quorum_update: Option<PendingQuorumUpdate>,
}

/// Quorum-gated vault over one or more asset ledgers
pub struct MultisigVault {
    state: Mutex<VaultState>,
    ledgers: LedgerRegistry,
    audit: Arc<AuditLogger>,
    store: Option<Arc<dyn SnapshotStore>>,
    metrics: Option<Arc<VaultMetrics>>,
    events: EventPublisher,
}

impl MultisigVault {
    /// Construct a vault
    ///
    /// The creator is added to the signer set. Fails when the quorum is
    /// below two, fewer than two candidates are given, a signer is null or
    /// repeated, or the quorum exceeds the resulting signer count.
    pub fn new(
        creator: AccountId,
        vault_account: AccountId,
        quorum: u32,
        candidates: &[AccountId],
    ) -> Result<Self> {
        let signers = build_signer_set(creator, quorum, candidates)?;
        if vault_account.is_null() {
            return Err(VaultError::NullAddress {
                field: "vault_account",
            });
        }

        info!(
            creator = %creator,
            vault_account = %vault_account,
            quorum = quorum,
            signers = signers.len(),
            "Vault created"
        );

        Ok(Self::from_state(VaultState::new(
            quorum,
            signers,
            creator,
            vault_account,
        )))
    }

    /// Resume a vault from a snapshot, re-checking every state invariant
    pub fn restore(snapshot: VaultSnapshot) -> Result<Self> {
        let state = VaultState::try_from(snapshot)?;

        info!(
            quorum = state.quorum,
            signers = state.signers.len(),
            tx_count = %state.tx_count,
            pending = state.pending_count(),
            "Vault restored from snapshot"
        );

        Ok(Self::from_state(state))
    }

    /// Resume from the latest snapshot in `store` and keep saving to it
    ///
    /// Returns `None` when the store holds no snapshot yet.
    pub async fn resume(store: Arc<dyn SnapshotStore>) -> Result<Option<Self>> {
        match store.load().await? {
            Some(snapshot) => Ok(Some(Self::restore(snapshot)?.with_snapshot_store(store))),
            None => Ok(None),
        }
    }

    fn from_state(state: VaultState) -> Self {
        Self {
            state: Mutex::new(state),
            ledgers: LedgerRegistry::new(),
            audit: Arc::new(AuditLogger::new()),
            store: None,
            metrics: None,
            events: EventPublisher::default(),
        }
    }

    /// Register an asset ledger transactions may reference
    pub fn with_ledger(mut self, ledger: Arc<dyn AssetLedger>) -> Self {
        debug!(ledger = %ledger.ledger_id(), "Asset ledger registered");
        self.ledgers.register(ledger);
        self
    }

    pub fn with_audit_logger(mut self, audit: Arc<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Save a snapshot after every accepted mutation
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<VaultMetrics>) -> Self {
        let state = self.state.get_mut();
        metrics.quorum.set(i64::from(state.quorum));
        metrics.pending_transactions.set(state.pending_count() as i64);
        self.metrics = Some(metrics);
        self
    }

    /// Receive every event committed from now on
    pub fn subscribe(&self) -> broadcast::Receiver<VaultEvent> {
        self.events.subscribe()
    }

    /// Registered asset ledger ids
    pub fn ledger_ids(&self) -> Vec<AccountId> {
        self.ledgers.ids()
    }

    /// Ledger and persistence details for the startup audit record
    pub fn startup_details(&self) -> HashMap<String, String> {
        let mut details = HashMap::new();
        details.insert(
            "ledgers".to_string(),
            self.ledger_ids()
                .iter()
                .map(AccountId::to_hex)
                .collect::<Vec<_>>()
                .join(","),
        );
        details.insert("persistent".to_string(), self.store.is_some().to_string());
        details
    }

    // ----- Accessors -----

    pub async fn quorum(&self) -> u32 {
        self.state.lock().await.quorum
    }

    /// Signer set, creator included, in ascending order
    pub async fn signers(&self) -> Vec<AccountId> {
        self.state.lock().await.signers.iter().copied().collect()
    }

    pub async fn is_valid_signer(&self, account: &AccountId) -> bool {
        self.state.lock().await.is_signer(account)
    }

    pub async fn no_of_valid_signers(&self) -> usize {
        self.state.lock().await.signers.len()
    }

    pub async fn creator(&self) -> AccountId {
        self.state.lock().await.creator
    }

    pub async fn vault_account(&self) -> AccountId {
        self.state.lock().await.vault_account
    }

    /// Highest transaction id issued, 0 before the first proposal
    pub async fn tx_count(&self) -> TxId {
        self.state.lock().await.tx_count
    }

    pub async fn transaction(&self, tx_id: TxId) -> Option<Transaction> {
        self.state.lock().await.transactions.get(&tx_id).cloned()
    }

    /// All transactions in id order, completed ones included
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.transactions.values().cloned().collect()
    }

    pub async fn pending_quorum_update(&self) -> Option<PendingQuorumUpdate> {
        self.state.lock().await.pending_quorum_update.clone()
    }

    /// Approvals gathered by the pending quorum update, 0 when none
    pub async fn keep_count_of_signers(&self) -> usize {
        self.state
            .lock()
            .await
            .pending_quorum_update
            .as_ref()
            .map_or(0, PendingQuorumUpdate::approval_count)
    }

    pub async fn summary(&self) -> VaultSummary {
        let state = self.state.lock().await;
        VaultSummary {
            quorum: state.quorum,
            signers: state.signers.iter().copied().collect(),
            creator: state.creator,
            vault_account: state.vault_account,
            tx_count: state.tx_count,
            pending_transactions: state.pending_count(),
            pending_quorum_update: state.pending_quorum_update.clone(),
        }
    }

    pub async fn snapshot(&self) -> VaultSnapshot {
        VaultSnapshot::from(&*self.state.lock().await)
    }

    /// Save the current state to the attached store, if any
    pub async fn checkpoint(&self) -> Result<()> {
        let state = self.state.lock().await;
        self.persist(&state).await
    }

    // ----- Operations -----

    /// Propose sending `amount` of `asset_ledger`'s asset to `recipient`
    ///
    /// The proposer's approval is recorded with the proposal. Fails without
    /// recording anything when the vault's ledger balance is short.
    #[instrument(
        skip(self),
        fields(caller = %caller, recipient = %recipient, asset_ledger = %asset_ledger)
    )]
    pub async fn transfer(
        &self,
        caller: AccountId,
        amount: u128,
        recipient: AccountId,
        asset_ledger: AccountId,
    ) -> Result<TxId> {
        let request = TransferRequest {
            caller,
            amount,
            recipient,
            asset_ledger,
        };
        let result = self.propose(request).await;
        if let Err(e) = &result {
            self.observe_failure("transfer", caller, e);
        }
        result
    }

    /// Approve a pending transaction, executing it once quorum is reached
    ///
    /// If the ledger rejects the transfer the approval still stands and the
    /// ledger error is returned; the transaction can be retried with
    /// [`MultisigVault::execute_tx`].
    #[instrument(skip(self), fields(caller = %caller, tx_id = %tx_id))]
    pub async fn approve_tx(&self, caller: AccountId, tx_id: TxId) -> Result<ApprovalOutcome> {
        let result = self.approve(caller, tx_id).await;
        if let Err(e) = &result {
            self.observe_failure("approve_tx", caller, e);
        }
        result
    }

    /// Retry the ledger transfer of a transaction that already has quorum
    #[instrument(skip(self), fields(caller = %caller, tx_id = %tx_id))]
    pub async fn execute_tx(&self, caller: AccountId, tx_id: TxId) -> Result<ApprovalOutcome> {
        let result = self.execute(caller, tx_id).await;
        if let Err(e) = &result {
            self.observe_failure("execute_tx", caller, e);
        }
        result
    }

    /// Vote for changing the quorum to `proposed`
    ///
    /// `caller` must equal `approver`. The change takes effect once the
    /// number of distinct approvers reaches the quorum currently in force.
    #[instrument(skip(self), fields(caller = %caller, approver = %approver))]
    pub async fn update_quorum(
        &self,
        caller: AccountId,
        proposed: u32,
        approver: AccountId,
    ) -> Result<QuorumUpdateOutcome> {
        let result = self.vote_quorum(caller, proposed, approver).await;
        if let Err(e) = &result {
            self.observe_failure("update_quorum", caller, e);
        }
        result
    }

    // ----- Internals -----

    async fn propose(&self, request: TransferRequest) -> Result<TxId> {
        let mut state = self.state.lock().await;
        validate_request(&state, &request)?;

        let ledger = self.ledgers.get(&request.asset_ledger)?;
        let available = self.timed(ledger.balance_of(state.vault_account)).await?;

        let mut next = state.clone();
        let tx_id = record_proposal(&mut next, &request, available)?;
        self.persist(&next).await?;
        *state = next;
        self.refresh_gauges(&state);
        drop(state);

        info!(tx_id = %tx_id, amount = request.amount, "Transfer proposed");
        if let Some(m) = &self.metrics {
            m.proposals_total.inc();
        }
        self.audit
            .log_proposal(request.caller, tx_id.0, request.amount, request.recipient);
        self.events.publish(VaultEvent::TransactionProposed {
            tx_id,
            proposer: request.caller,
            amount: request.amount,
            recipient: request.recipient,
            asset_ledger: request.asset_ledger,
            timestamp: now_ms(),
        });

        Ok(tx_id)
    }

    async fn approve(&self, caller: AccountId, tx_id: TxId) -> Result<ApprovalOutcome> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let progress = record_approval(&mut next, caller, tx_id)?;

        debug!(approvals = progress.approvals, required = progress.required, "Approval recorded");

        let approved = VaultEvent::TransactionApproved {
            tx_id,
            approver: caller,
            approvals: progress.approvals,
            required: progress.required,
            timestamp: now_ms(),
        };

        if !progress.ready() {
            self.persist(&next).await?;
            *state = next;
            drop(state);

            self.note_approval(caller, &progress);
            self.events.publish(approved);
            return Ok(ApprovalOutcome::Pending {
                tx_id,
                approvals: progress.approvals,
                required: progress.required,
            });
        }

        match self.settle(&mut next, caller, tx_id).await {
            Ok(executed) => {
                self.commit_settled(&mut state, next).await;
                drop(state);

                self.note_approval(caller, &progress);
                self.events.publish_all([approved, executed]);
                Ok(ApprovalOutcome::Executed {
                    tx_id,
                    approvals: progress.approvals,
                })
            }
            Err(failure) => {
                // The approval is kept even though completion is withheld
                self.persist(&next).await?;
                *state = next;
                drop(state);

                self.note_approval(caller, &progress);
                self.events.publish_all([approved, Self::execution_failed(tx_id, &failure)]);
                Err(failure)
            }
        }
    }

    async fn execute(&self, caller: AccountId, tx_id: TxId) -> Result<ApprovalOutcome> {
        let mut state = self.state.lock().await;
        let progress = check_executable(&state, caller, tx_id)?;

        let mut next = state.clone();
        match self.settle(&mut next, caller, tx_id).await {
            Ok(executed) => {
                self.commit_settled(&mut state, next).await;
                drop(state);

                self.events.publish(executed);
                Ok(ApprovalOutcome::Executed {
                    tx_id,
                    approvals: progress.approvals,
                })
            }
            Err(failure) => {
                drop(state);
                self.events.publish(Self::execution_failed(tx_id, &failure));
                Err(failure)
            }
        }
    }

    async fn vote_quorum(
        &self,
        caller: AccountId,
        proposed: u32,
        approver: AccountId,
    ) -> Result<QuorumUpdateOutcome> {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let outcome = QuorumManager::new(&mut next).approve_update(caller, proposed, approver)?;

        self.persist(&next).await?;
        *state = next;
        self.refresh_gauges(&state);
        drop(state);

        let timestamp = now_ms();
        match outcome {
            QuorumUpdateOutcome::Pending {
                proposed,
                approvals,
                required,
            } => {
                debug!(proposed, approvals, required, "Quorum update pending");
                self.audit.log(
                    AuditEvent::new(
                        AuditCategory::Governance,
                        "quorum_update_approve",
                        AuditOutcome::Success,
                    )
                    .with_actor(approver)
                    .with_resource("quorum")
                    .with_detail("proposed", proposed)
                    .with_detail("approvals", approvals)
                    .with_detail("required", required),
                );

                let event = if approvals == 1 {
                    VaultEvent::QuorumUpdateProposed {
                        proposed,
                        proposer: approver,
                        timestamp,
                    }
                } else {
                    VaultEvent::QuorumUpdateApproved {
                        proposed,
                        approver,
                        approvals,
                        required,
                        timestamp,
                    }
                };
                self.events.publish(event);
            }
            QuorumUpdateOutcome::Applied { previous, current } => {
                info!(previous, current, "Quorum updated");
                if let Some(m) = &self.metrics {
                    m.quorum_updates_total.inc();
                }
                self.audit.log_quorum_change(approver, previous, current);
                self.events.publish_all([
                    VaultEvent::QuorumUpdateApproved {
                        proposed: current,
                        approver,
                        approvals: previous as usize,
                        required: previous,
                        timestamp,
                    },
                    VaultEvent::QuorumUpdated {
                        previous,
                        current,
                        timestamp,
                    },
                ]);
            }
        }

        Ok(outcome)
    }

    /// Run the ledger transfer for `tx_id` and mark it completed in `next`
    async fn settle(
        &self,
        next: &mut VaultState,
        caller: AccountId,
        tx_id: TxId,
    ) -> Result<VaultEvent> {
        let (amount, recipient, asset_ledger, approvals) = {
            let tx = next.pending_transaction(tx_id)?;
            (tx.amount, tx.recipient, tx.asset_ledger, tx.approval_count())
        };

        let outcome = match self.ledgers.get(&asset_ledger) {
            Ok(ledger) => {
                self.timed(ledger.transfer(next.vault_account, recipient, amount))
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            warn!(tx_id = %tx_id, ledger = %asset_ledger, error = %e, "Ledger transfer failed");
            if let Some(m) = &self.metrics {
                m.execution_failures_total.inc();
            }
            self.audit
                .log_execution(caller, tx_id.0, false, Some(&e.to_string()));
            return Err(VaultError::ExternalLedgerFailure(e));
        }

        next.pending_transaction_mut(tx_id)?.mark_completed();

        info!(tx_id = %tx_id, amount, recipient = %recipient, "Transfer executed");
        if let Some(m) = &self.metrics {
            m.executions_total.inc();
        }
        self.audit.log_execution(caller, tx_id.0, true, None);

        Ok(VaultEvent::TransactionExecuted {
            tx_id,
            amount,
            recipient,
            approvals,
            timestamp: now_ms(),
        })
    }

    /// Commit a state whose ledger transfer already happened
    ///
    /// Funds have moved, so a failed save cannot undo the commit; it is
    /// logged and the next successful save catches up.
    async fn commit_settled(&self, state: &mut VaultState, next: VaultState) {
        if let Err(e) = self.persist(&next).await {
            error!(error = %e, "Snapshot save failed after ledger transfer");
        }
        *state = next;
        self.refresh_gauges(state);
    }

    async fn persist(&self, state: &VaultState) -> Result<()> {
        match &self.store {
            Some(store) => store.save(&VaultSnapshot::from(state)).await,
            None => Ok(()),
        }
    }

    async fn timed<F: Future>(&self, call: F) -> F::Output {
        let timer = self
            .metrics
            .as_ref()
            .map(|m| m.ledger_call_duration_seconds.start_timer());
        let output = call.await;
        if let Some(timer) = timer {
            timer.observe_duration();
        }
        output
    }

    fn note_approval(&self, caller: AccountId, progress: &ApprovalProgress) {
        if let Some(m) = &self.metrics {
            m.approvals_total.inc();
        }
        self.audit.log_approval(
            caller,
            progress.tx_id.0,
            progress.approvals,
            progress.required,
        );
    }

    fn refresh_gauges(&self, state: &VaultState) {
        if let Some(m) = &self.metrics {
            m.quorum.set(i64::from(state.quorum));
            m.pending_transactions.set(state.pending_count() as i64);
        }
    }

    fn execution_failed(tx_id: TxId, failure: &VaultError) -> VaultEvent {
        VaultEvent::ExecutionFailed {
            tx_id,
            reason: failure.to_string(),
            timestamp: now_ms(),
        }
    }

    fn observe_failure(&self, operation: &str, caller: AccountId, error: &VaultError) {
        match error {
            VaultError::ExternalLedgerFailure(_) => {}
            VaultError::Storage(_) | VaultError::Serialization(_) => {
                error!(operation, error = %error, "Vault operation failed to persist");
            }
            VaultError::InvalidSigner(_) => {
                warn!(operation, caller = %caller, "Rejected request from non-signer");
                self.audit
                    .log_authorization_denied(caller, operation, &error.to_string());
                self.count_rejection(error);
            }
            _ => {
                debug!(operation, error = %error, "Request rejected");
                self.count_rejection(error);
            }
        }
    }

    fn count_rejection(&self, error: &VaultError) {
        if let Some(m) = &self.metrics {
            m.record_rejection(error.kind());
        }
    }
}

impl std::fmt::Debug for MultisigVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultisigVault")
            .field("ledgers", &self.ledgers.ids())
            .field("persistent", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryAssetLedger;
    use crate::storage::MemorySnapshotStore;
    use custos_common::security::MemoryAuditSink;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    const VAULT: u8 = 100;
    const LEDGER: u8 = 60;

    fn ledger(balance: u128) -> Arc<InMemoryAssetLedger> {
        Arc::new(InMemoryAssetLedger::new(account(LEDGER)).with_balance(account(VAULT), balance))
    }

    fn vault(ledger: Arc<InMemoryAssetLedger>) -> MultisigVault {
        MultisigVault::new(account(1), account(VAULT), 2, &[account(2), account(3)])
            .unwrap()
            .with_ledger(ledger)
            .with_audit_logger(Arc::new(AuditLogger::silent()))
    }

    #[tokio::test]
    async fn test_null_vault_account_rejected() {
        let result = MultisigVault::new(account(1), AccountId::NULL, 2, &[account(2), account(3)]);
        assert_eq!(
            result.unwrap_err(),
            VaultError::NullAddress {
                field: "vault_account"
            }
        );
    }

    #[tokio::test]
    async fn test_unregistered_ledger_fails_as_ledger_error() {
        let v = vault(ledger(100));
        let err = v
            .transfer(account(1), 10, account(50), account(61))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VaultError::ExternalLedgerFailure(custos_common::LedgerError::UnknownLedger(_))
        ));
        assert_eq!(v.tx_count().await, TxId(0));
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_state_unchanged() {
        let store = Arc::new(MemorySnapshotStore::new());
        let v = vault(ledger(100)).with_snapshot_store(store.clone());

        store.fail_saves("disk full");
        let err = v
            .transfer(account(1), 10, account(50), account(LEDGER))
            .await
            .unwrap_err();
        assert_eq!(err, VaultError::Storage("disk full".to_string()));
        assert_eq!(v.tx_count().await, TxId(0));
        assert!(v.transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_after_transfer_keeps_commit() {
        let store = Arc::new(MemorySnapshotStore::new());
        let l = ledger(100);
        let v = vault(l.clone()).with_snapshot_store(store.clone());

        let id = v
            .transfer(account(1), 10, account(50), account(LEDGER))
            .await
            .unwrap();

        store.fail_saves("disk full");
        let outcome = v.approve_tx(account(2), id).await.unwrap();
        assert!(matches!(outcome, ApprovalOutcome::Executed { .. }));
        assert!(v.transaction(id).await.unwrap().is_completed);
        assert_eq!(l.balance(&account(50)), 10);

        // The stored snapshot still shows the transaction pending
        let saved = store.latest().unwrap();
        assert!(!saved.transactions[0].is_completed);
    }

    #[tokio::test]
    async fn test_non_signer_is_audited() {
        let sink = MemoryAuditSink::new();
        let v = vault(ledger(100))
            .with_audit_logger(Arc::new(AuditLogger::silent().with_sink(Box::new(sink.clone()))));

        let err = v
            .transfer(account(9), 10, account(50), account(LEDGER))
            .await
            .unwrap_err();
        assert_eq!(err, VaultError::InvalidSigner(account(9)));

        let denials = sink.events_in(AuditCategory::Authorization);
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].actor, Some(account(9)));
    }

    #[tokio::test]
    async fn test_metrics_follow_operations() {
        let metrics = Arc::new(VaultMetrics::new().unwrap());
        let v = vault(ledger(100)).with_metrics(metrics.clone());
        assert_eq!(metrics.quorum.get(), 2);

        let id = v
            .transfer(account(1), 10, account(50), account(LEDGER))
            .await
            .unwrap();
        assert_eq!(metrics.pending_transactions.get(), 1);

        let _ = v.approve_tx(account(1), id).await;
        v.approve_tx(account(2), id).await.unwrap();

        assert_eq!(metrics.proposals_total.get(), 1);
        assert_eq!(metrics.approvals_total.get(), 1);
        assert_eq!(metrics.executions_total.get(), 1);
        assert_eq!(metrics.pending_transactions.get(), 0);
        assert_eq!(
            metrics
                .rejected_requests_total
                .with_label_values(&["duplicate_approval"])
                .get(),
            1
        );
    }

    #[tokio::test]
    async fn test_events_for_execution() {
        let v = vault(ledger(100));
        let mut rx = v.subscribe();

        let id = v
            .transfer(account(1), 10, account(50), account(LEDGER))
            .await
            .unwrap();
        v.approve_tx(account(3), id).await.unwrap();

        let kinds: Vec<_> = (0..3).map(|_| rx.try_recv().unwrap().kind()).collect();
        assert_eq!(
            kinds,
            vec!["TransactionProposed", "TransactionApproved", "TransactionExecuted"]
        );
    }

    #[tokio::test]
    async fn test_summary_and_startup_details() {
        let v = vault(ledger(100));
        let summary = v.summary().await;
        assert_eq!(summary.quorum, 2);
        assert_eq!(summary.signers.len(), 3);
        assert_eq!(summary.pending_transactions, 0);

        let details = v.startup_details();
        assert_eq!(details["persistent"], "false");
        assert_eq!(details["ledgers"], account(LEDGER).to_hex());
    }
}
