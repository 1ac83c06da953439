//! Custos Vault Service Binary
//!
//! Runs one vault over an in-memory asset ledger and serves it over REST.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use custos_common::security::AuditLogger;
use custos_vault::{
    api, FileSnapshotStore, InMemoryAssetLedger, MultisigVault, SnapshotStore, VaultMetrics,
    VaultServiceConfig, VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Custos Vault Service v{}", VERSION);

    let config = VaultServiceConfig::load()?;
    config.validate()?;
    info!("Loaded configuration: {:?}", config);

    let store: Option<Arc<dyn SnapshotStore>> = config
        .storage
        .snapshot_path
        .as_ref()
        .map(|path| Arc::new(FileSnapshotStore::new(path)) as Arc<dyn SnapshotStore>);

    let vault = match &store {
        Some(store) => match MultisigVault::resume(store.clone()).await? {
            Some(vault) => vault,
            None => {
                info!("No snapshot found, creating vault from configuration");
                build_from_config(&config)?.with_snapshot_store(store.clone())
            }
        },
        None => {
            warn!("CUSTOS_SNAPSHOT_PATH unset, vault state will not survive restarts");
            build_from_config(&config)?
        }
    };

    // Seed the built-in ledger with the vault's own balance
    let vault_account = vault.vault_account().await;
    let ledger = InMemoryAssetLedger::new(config.ledger.ledger_id)
        .with_balance(vault_account, config.ledger.initial_balance);

    let registry = prometheus::Registry::new();
    let metrics = Arc::new(VaultMetrics::new()?);
    metrics.register(&registry)?;

    let audit = Arc::new(AuditLogger::new());
    let vault = vault
        .with_ledger(Arc::new(ledger))
        .with_audit_logger(audit.clone())
        .with_metrics(metrics);

    // Persist the starting point so a restart resumes the same signer set
    vault.checkpoint().await.context("initial snapshot")?;
    audit.log_system("vault_started", vault.startup_details());

    let summary = vault.summary().await;
    info!(
        "Vault ready: quorum={}, signers={}, pending={}",
        summary.quorum,
        summary.signers.len(),
        summary.pending_transactions
    );

    let app = api::router(Arc::new(vault), registry);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server started on {}", addr);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    audit.flush();
    info!("Shutting down Custos Vault Service");
    Ok(())
}

fn build_from_config(config: &VaultServiceConfig) -> Result<MultisigVault> {
    let vault = MultisigVault::new(
        config.vault.creator,
        config.vault.vault_account,
        config.vault.quorum,
        &config.vault.signers,
    )
    .context("invalid vault configuration")?;
    Ok(vault)
}
