//! # Custos Vault
//!
//! Quorum-gated multi-signer vault. A fixed set of signers jointly controls
//! the vault's holdings on external asset ledgers: any signer may propose a
//! transfer, and the transfer executes once enough distinct signers have
//! approved it. The quorum itself can only change through the same kind of
//! multi-signer agreement.
//!
//! ## Components
//!
//! - **Governance**: signer-set construction and quorum updates
//! - **Transfer**: proposals, approvals and execution readiness
//! - **Ledger**: the [`AssetLedger`] capability and an in-memory ledger
//! - **Storage**: snapshot persistence for restart recovery
//! - **API**: axum REST surface for the `custos-vault` binary
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       MultisigVault                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Governance  │  │  Transfer   │  │   Events / Audit    │  │
//! │  │  (quorum)   │──│ (approvals) │──│     / Metrics       │  │
//! │  └─────────────┘  └──────┬──────┘  └─────────────────────┘  │
//! │                          │                                  │
//! │        ┌─────────────────┴──────────────┐                   │
//! │  ┌─────┴───────┐                 ┌──────┴──────┐            │
//! │  │ AssetLedger │                 │  Snapshot   │            │
//! │  │ (external)  │                 │    Store    │            │
//! │  └─────────────┘                 └─────────────┘            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod events;
pub mod governance;
pub mod ledger;
pub mod metrics;
pub mod state;
pub mod storage;
pub mod transfer;

pub use config::VaultServiceConfig;
pub use engine::{MultisigVault, VaultSummary};
pub use events::VaultEvent;
pub use governance::QuorumUpdateOutcome;
pub use ledger::{AssetLedger, InMemoryAssetLedger, LedgerRegistry};
pub use metrics::VaultMetrics;
pub use state::{VaultSnapshot, VaultState};
pub use storage::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use transfer::ApprovalOutcome;

/// Vault service version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default REST port
pub const DEFAULT_PORT: u16 = 8090;
