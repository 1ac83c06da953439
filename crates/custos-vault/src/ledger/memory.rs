//! In-memory asset ledger
//!
//! Substitute ledger for tests and the standalone service. Balances live in
//! one mutex-guarded map so every transfer is atomic. Failures can be
//! injected to exercise the vault's handling of ledger-side rejections.

use std::collections::HashMap;

use async_trait::async_trait;
use custos_common::{AccountId, LedgerError};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AssetLedger;

/// Completed transfer as recorded by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransfer {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: u128,
    pub timestamp: i64,
}

pub struct InMemoryAssetLedger {
    id: AccountId,
    balances: Mutex<HashMap<AccountId, u128>>,
    history: RwLock<Vec<LedgerTransfer>>,
    /// When set, every transfer is rejected with this reason
    failure: RwLock<Option<String>>,
}

impl InMemoryAssetLedger {
    /// Create an empty ledger
    pub fn new(id: AccountId) -> Self {
        Self {
            id,
            balances: Mutex::new(HashMap::new()),
            history: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    /// Seed a balance, builder style
    pub fn with_balance(self, account: AccountId, amount: u128) -> Self {
        self.mint(account, amount);
        self
    }

    /// Credit `amount` to `account` out of thin air
    pub fn mint(&self, account: AccountId, amount: u128) {
        let mut balances = self.balances.lock();
        let entry = balances.entry(account).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Synchronous balance lookup
    pub fn balance(&self, account: &AccountId) -> u128 {
        self.balances.lock().get(account).copied().unwrap_or(0)
    }

    /// Reject every following transfer with `reason`
    pub fn fail_transfers(&self, reason: &str) {
        *self.failure.write() = Some(reason.to_string());
    }

    /// Stop rejecting transfers
    pub fn resume_transfers(&self) {
        *self.failure.write() = None;
    }

    /// Transfers executed so far, oldest first
    pub fn transfers(&self) -> Vec<LedgerTransfer> {
        self.history.read().clone()
    }
}

#[async_trait]
impl AssetLedger for InMemoryAssetLedger {
    fn ledger_id(&self) -> AccountId {
        self.id
    }

    async fn balance_of(&self, account: AccountId) -> Result<u128, LedgerError> {
        Ok(self.balance(&account))
    }

    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if let Some(reason) = self.failure.read().clone() {
            return Err(LedgerError::Rejected(reason));
        }
        if to.is_null() {
            return Err(LedgerError::Rejected("transfer to null account".to_string()));
        }

        {
            let mut balances = self.balances.lock();
            let available = balances.get(&from).copied().unwrap_or(0);
            if available < amount {
                return Err(LedgerError::InsufficientBalance {
                    required: amount,
                    available,
                });
            }

            balances.insert(from, available - amount);
            let credited = balances.entry(to).or_insert(0);
            *credited = credited.saturating_add(amount);
        }

        self.history.write().push(LedgerTransfer {
            from,
            to,
            amount,
            timestamp: chrono::Utc::now().timestamp_millis(),
        });

        debug!(ledger = %self.id, from = %from, to = %to, amount = amount, "Ledger transfer applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    #[tokio::test]
    async fn test_transfer_moves_balance() {
        let ledger = InMemoryAssetLedger::new(account(60)).with_balance(account(1), 500);

        ledger.transfer(account(1), account(2), 200).await.unwrap();

        assert_eq!(ledger.balance_of(account(1)).await.unwrap(), 300);
        assert_eq!(ledger.balance_of(account(2)).await.unwrap(), 200);
        assert_eq!(ledger.transfers().len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_is_all_or_nothing() {
        let ledger = InMemoryAssetLedger::new(account(60)).with_balance(account(1), 50);

        let result = ledger.transfer(account(1), account(2), 80).await;
        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                required: 80,
                available: 50
            })
        );
        assert_eq!(ledger.balance(&account(1)), 50);
        assert_eq!(ledger.balance(&account(2)), 0);
        assert!(ledger.transfers().is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let ledger = InMemoryAssetLedger::new(account(60)).with_balance(account(1), 50);

        ledger.fail_transfers("paused");
        assert!(matches!(
            ledger.transfer(account(1), account(2), 10).await,
            Err(LedgerError::Rejected(reason)) if reason == "paused"
        ));

        ledger.resume_transfers();
        assert!(ledger.transfer(account(1), account(2), 10).await.is_ok());
    }
}
