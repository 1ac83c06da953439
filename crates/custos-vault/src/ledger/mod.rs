//! External asset ledgers
//!
//! The vault never keeps token balances itself. Each transaction names the
//! ledger that holds the asset, and the vault calls that ledger through the
//! [`AssetLedger`] capability to check its own balance and, once quorum is
//! reached, to move the funds.

pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use custos_common::{AccountId, LedgerError};

pub use memory::{InMemoryAssetLedger, LedgerTransfer};

/// Fungible-asset ledger interface consumed by the vault
#[async_trait]
pub trait AssetLedger: Send + Sync {
    /// Identifier transactions use to reference this ledger
    fn ledger_id(&self) -> AccountId;

    /// Balance held by `account`; must not mutate the ledger
    async fn balance_of(&self, account: AccountId) -> Result<u128, LedgerError>;

    /// Move `amount` from `from` to `to`, all or nothing
    async fn transfer(&self, from: AccountId, to: AccountId, amount: u128)
        -> Result<(), LedgerError>;
}

/// Ledgers a vault may call, keyed by ledger id
#[derive(Clone, Default)]
pub struct LedgerRegistry {
    ledgers: HashMap<AccountId, Arc<dyn AssetLedger>>,
}

impl LedgerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ledger under its own id, replacing any previous entry
    pub fn register(&mut self, ledger: Arc<dyn AssetLedger>) {
        self.ledgers.insert(ledger.ledger_id(), ledger);
    }

    /// Resolve a ledger id
    pub fn get(&self, id: &AccountId) -> Result<Arc<dyn AssetLedger>, LedgerError> {
        self.ledgers
            .get(id)
            .cloned()
            .ok_or(LedgerError::UnknownLedger(*id))
    }

    pub fn contains(&self, id: &AccountId) -> bool {
        self.ledgers.contains_key(id)
    }

    /// Registered ledger ids
    pub fn ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<_> = self.ledgers.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.ledgers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledgers.is_empty()
    }
}
