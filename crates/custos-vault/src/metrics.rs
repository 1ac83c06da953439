//! Prometheus metrics for the vault

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

/// Vault counters and gauges
///
/// Construct once per vault and attach with
/// [`crate::MultisigVault::with_metrics`]; expose by registering on the
/// registry the service renders at `/metrics`.
#[derive(Clone)]
pub struct VaultMetrics {
    pub proposals_total: IntCounter,
    pub approvals_total: IntCounter,
    pub executions_total: IntCounter,
    pub execution_failures_total: IntCounter,
    /// Rejected requests, labelled by error kind
    pub rejected_requests_total: IntCounterVec,
    pub quorum_updates_total: IntCounter,
    pub quorum: IntGauge,
    pub pending_transactions: IntGauge,
    pub ledger_call_duration_seconds: Histogram,
}

impl VaultMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            proposals_total: IntCounter::new(
                "custos_vault_proposals_total",
                "Transfer proposals recorded",
            )?,
            approvals_total: IntCounter::new(
                "custos_vault_approvals_total",
                "Transfer approvals recorded, proposer approvals excluded",
            )?,
            executions_total: IntCounter::new(
                "custos_vault_executions_total",
                "Transfers executed on an asset ledger",
            )?,
            execution_failures_total: IntCounter::new(
                "custos_vault_execution_failures_total",
                "Ledger transfers that failed after quorum was reached",
            )?,
            rejected_requests_total: IntCounterVec::new(
                Opts::new(
                    "custos_vault_rejected_requests_total",
                    "Requests rejected by validation or authorization",
                ),
                &["reason"],
            )?,
            quorum_updates_total: IntCounter::new(
                "custos_vault_quorum_updates_total",
                "Quorum changes applied",
            )?,
            quorum: IntGauge::new("custos_vault_quorum", "Current approval quorum")?,
            pending_transactions: IntGauge::new(
                "custos_vault_pending_transactions",
                "Transactions awaiting execution",
            )?,
            ledger_call_duration_seconds: Histogram::with_opts(
                HistogramOpts::new(
                    "custos_vault_ledger_call_duration_seconds",
                    "Asset ledger call latency",
                )
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.proposals_total.clone()))?;
        registry.register(Box::new(self.approvals_total.clone()))?;
        registry.register(Box::new(self.executions_total.clone()))?;
        registry.register(Box::new(self.execution_failures_total.clone()))?;
        registry.register(Box::new(self.rejected_requests_total.clone()))?;
        registry.register(Box::new(self.quorum_updates_total.clone()))?;
        registry.register(Box::new(self.quorum.clone()))?;
        registry.register(Box::new(self.pending_transactions.clone()))?;
        registry.register(Box::new(self.ledger_call_duration_seconds.clone()))?;
        Ok(())
    }

    pub fn record_rejection(&self, kind: &str) {
        self.rejected_requests_total.with_label_values(&[kind]).inc();
    }
}

/// Render a registry in the Prometheus text exposition format
pub fn render(registry: &Registry) -> Result<String, prometheus::Error> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
