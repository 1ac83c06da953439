//! Vault service configuration

use std::path::PathBuf;

use custos_common::{AccountId, Result, VaultError};
use serde::{Deserialize, Serialize};

/// Vault service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultServiceConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Governance parameters used when no snapshot exists
    pub vault: VaultSettings,
    /// Built-in asset ledger
    pub ledger: LedgerSettings,
    /// Snapshot persistence
    pub storage: StorageSettings,
}

impl Default for VaultServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: crate::DEFAULT_PORT,
            vault: VaultSettings::default(),
            ledger: LedgerSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl VaultServiceConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    ///
    /// Unset variables keep their defaults; malformed ones are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        // PORT is honoured for platform deployments, CUSTOS_PORT wins
        if let Some(port) = lookup("PORT") {
            cfg.port = parse("PORT", &port)?;
        }
        if let Some(host) = lookup("CUSTOS_HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("CUSTOS_PORT") {
            cfg.port = parse("CUSTOS_PORT", &port)?;
        }

        if let Some(val) = lookup("CUSTOS_QUORUM") {
            cfg.vault.quorum = parse("CUSTOS_QUORUM", &val)?;
        }
        if let Some(val) = lookup("CUSTOS_SIGNERS") {
            cfg.vault.signers = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| account("CUSTOS_SIGNERS", s))
                .collect::<Result<_>>()?;
        }
        if let Some(val) = lookup("CUSTOS_CREATOR") {
            cfg.vault.creator = account("CUSTOS_CREATOR", &val)?;
        }
        if let Some(val) = lookup("CUSTOS_VAULT_ACCOUNT") {
            cfg.vault.vault_account = account("CUSTOS_VAULT_ACCOUNT", &val)?;
        }

        if let Some(val) = lookup("CUSTOS_LEDGER_ID") {
            cfg.ledger.ledger_id = account("CUSTOS_LEDGER_ID", &val)?;
        }
        if let Some(val) = lookup("CUSTOS_LEDGER_INITIAL_BALANCE") {
            cfg.ledger.initial_balance = parse("CUSTOS_LEDGER_INITIAL_BALANCE", &val)?;
        }

        if let Some(val) = lookup("CUSTOS_SNAPSHOT_PATH") {
            let val = val.trim();
            cfg.storage.snapshot_path = (!val.is_empty()).then(|| PathBuf::from(val));
        }

        Ok(cfg)
    }

    /// Check that every required identity is present
    ///
    /// Quorum rules are enforced by vault construction itself.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(VaultError::Config("port must be non-zero".to_string()));
        }
        if self.vault.creator.is_null() {
            return Err(VaultError::Config("CUSTOS_CREATOR is required".to_string()));
        }
        if self.vault.vault_account.is_null() {
            return Err(VaultError::Config("CUSTOS_VAULT_ACCOUNT is required".to_string()));
        }
        if self.vault.signers.is_empty() {
            return Err(VaultError::Config("CUSTOS_SIGNERS is required".to_string()));
        }
        if self.ledger.ledger_id.is_null() {
            return Err(VaultError::Config("CUSTOS_LEDGER_ID is required".to_string()));
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| VaultError::Config(format!("{}: {}", key, e)))
}

fn account(key: &str, value: &str) -> Result<AccountId> {
    AccountId::parse(value.trim()).map_err(|e| VaultError::Config(format!("{}: {}", key, e)))
}

/// Governance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Initial quorum
    pub quorum: u32,
    /// Candidate signers, creator excluded
    pub signers: Vec<AccountId>,
    /// Vault creator, always a signer
    pub creator: AccountId,
    /// The vault's own account on the asset ledger
    pub vault_account: AccountId,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            quorum: custos_common::MIN_QUORUM,
            signers: Vec::new(),
            creator: AccountId::NULL,
            vault_account: AccountId::NULL,
        }
    }
}

/// In-memory asset ledger settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSettings {
    pub ledger_id: AccountId,
    /// Balance credited to the vault account at startup
    pub initial_balance: u128,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            ledger_id: AccountId::NULL,
            initial_balance: 0,
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Snapshot file; state is kept in memory only when unset
    pub snapshot_path: Option<PathBuf>,
}
