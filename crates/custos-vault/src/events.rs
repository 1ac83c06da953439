//! Vault events
//!
//! Every committed state transition is published on a broadcast channel.
//! Subscribers that fall behind lose the oldest events; the vault itself
//! never blocks on them.

use custos_common::{AccountId, TxId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;

/// Default broadcast buffer per vault
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// State transitions observable by subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum VaultEvent {
    /// New transfer recorded with the proposer's approval
    TransactionProposed {
        tx_id: TxId,
        proposer: AccountId,
        amount: u128,
        recipient: AccountId,
        asset_ledger: AccountId,
        timestamp: i64,
    },
    /// Additional approval recorded, quorum not yet reached
    TransactionApproved {
        tx_id: TxId,
        approver: AccountId,
        approvals: usize,
        required: u32,
        timestamp: i64,
    },
    /// Ledger transfer succeeded and the transaction is completed
    TransactionExecuted {
        tx_id: TxId,
        amount: u128,
        recipient: AccountId,
        approvals: usize,
        timestamp: i64,
    },
    /// Quorum was reached but the ledger refused the transfer
    ExecutionFailed {
        tx_id: TxId,
        reason: String,
        timestamp: i64,
    },
    /// A new quorum value was put forward
    QuorumUpdateProposed {
        proposed: u32,
        proposer: AccountId,
        timestamp: i64,
    },
    /// Another signer backed the pending quorum value
    QuorumUpdateApproved {
        proposed: u32,
        approver: AccountId,
        approvals: usize,
        required: u32,
        timestamp: i64,
    },
    /// Quorum changed
    QuorumUpdated {
        previous: u32,
        current: u32,
        timestamp: i64,
    },
}

impl VaultEvent {
    /// Event name as serialized in the `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            VaultEvent::TransactionProposed { .. } => "TransactionProposed",
            VaultEvent::TransactionApproved { .. } => "TransactionApproved",
            VaultEvent::TransactionExecuted { .. } => "TransactionExecuted",
            VaultEvent::ExecutionFailed { .. } => "ExecutionFailed",
            VaultEvent::QuorumUpdateProposed { .. } => "QuorumUpdateProposed",
            VaultEvent::QuorumUpdateApproved { .. } => "QuorumUpdateApproved",
            VaultEvent::QuorumUpdated { .. } => "QuorumUpdated",
        }
    }

    /// Transaction the event refers to, if any
    pub fn tx_id(&self) -> Option<TxId> {
        match self {
            VaultEvent::TransactionProposed { tx_id, .. }
            | VaultEvent::TransactionApproved { tx_id, .. }
            | VaultEvent::TransactionExecuted { tx_id, .. }
            | VaultEvent::ExecutionFailed { tx_id, .. } => Some(*tx_id),
            _ => None,
        }
    }
}

/// Sending half shared by a vault's operations
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<VaultEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<VaultEvent> {
        self.sender.subscribe()
    }

    /// Publish to current subscribers; having none is not an error
    pub fn publish(&self, event: VaultEvent) {
        let kind = event.kind();
        match self.sender.send(event) {
            Ok(receivers) => trace!(event = kind, receivers, "Event published"),
            Err(_) => trace!(event = kind, "No event subscribers"),
        }
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = VaultEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_is_tagged() {
        let event = VaultEvent::QuorumUpdated {
            previous: 2,
            current: 3,
            timestamp: 0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "QuorumUpdated");
        assert_eq!(json["data"]["current"], 3);
        assert_eq!(event.tx_id(), None);
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let publisher = EventPublisher::default();
        // Sending with no receivers must not panic
        publisher.publish(VaultEvent::ExecutionFailed {
            tx_id: TxId(1),
            reason: "dropped".to_string(),
            timestamp: 0,
        });

        let mut rx = publisher.subscribe();
        publisher.publish(VaultEvent::ExecutionFailed {
            tx_id: TxId(2),
            reason: "ledger offline".to_string(),
            timestamp: 0,
        });

        let received = rx.recv().await.unwrap();
        assert_eq!(received.tx_id(), Some(TxId(2)));
        assert_eq!(received.kind(), "ExecutionFailed");
    }
}
