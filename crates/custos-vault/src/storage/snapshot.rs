//! Snapshot store implementations

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use custos_common::{Result, VaultError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::state::VaultSnapshot;

/// Durable home for the latest vault snapshot
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Latest saved snapshot, `None` when nothing was saved yet
    async fn load(&self) -> Result<Option<VaultSnapshot>>;

    /// Replace the saved snapshot
    async fn save(&self, snapshot: &VaultSnapshot) -> Result<()>;
}

/// On-disk layout: the snapshot plus a BLAKE3 digest of its compact JSON
/// encoding
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEnvelope {
    checksum: String,
    snapshot: VaultSnapshot,
}

impl SnapshotEnvelope {
    fn seal(snapshot: &VaultSnapshot) -> Result<Self> {
        Ok(Self {
            checksum: digest(snapshot)?,
            snapshot: snapshot.clone(),
        })
    }

    fn open(self) -> Result<VaultSnapshot> {
        let actual = digest(&self.snapshot)?;
        if actual != self.checksum {
            return Err(VaultError::CorruptSnapshot(format!(
                "checksum mismatch: stored {}, computed {}",
                self.checksum, actual
            )));
        }
        Ok(self.snapshot)
    }
}

fn digest(snapshot: &VaultSnapshot) -> Result<String> {
    let bytes = serde_json::to_vec(snapshot)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// JSON file store
///
/// Saves go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<VaultSnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let envelope: SnapshotEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| VaultError::CorruptSnapshot(e.to_string()))?;
        let snapshot = envelope.open()?;

        debug!(tx_count = %snapshot.tx_count, "Snapshot loaded");
        Ok(Some(snapshot))
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    async fn save(&self, snapshot: &VaultSnapshot) -> Result<()> {
        let envelope = SnapshotEnvelope::seal(snapshot)?;
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(bytes = bytes.len(), "Snapshot saved");
        Ok(())
    }
}

/// In-process store, for tests and ephemeral vaults
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    latest: RwLock<Option<VaultSnapshot>>,
    saves: RwLock<u64>,
    /// When set, every save fails with this message
    failure: RwLock<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest saved snapshot without going through the async trait
    pub fn latest(&self) -> Option<VaultSnapshot> {
        self.latest.read().clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u64 {
        *self.saves.read()
    }

    /// Make every following save fail with `reason`
    pub fn fail_saves(&self, reason: &str) {
        *self.failure.write() = Some(reason.to_string());
    }

    pub fn resume_saves(&self) {
        *self.failure.write() = None;
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self) -> Result<Option<VaultSnapshot>> {
        Ok(self.latest())
    }

    async fn save(&self, snapshot: &VaultSnapshot) -> Result<()> {
        if let Some(reason) = self.failure.read().clone() {
            return Err(VaultError::Storage(reason));
        }
        *self.latest.write() = Some(snapshot.clone());
        *self.saves.write() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::VaultState;
    use custos_common::{AccountId, Transaction, TxId};
    use std::collections::BTreeSet;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    fn snapshot() -> VaultSnapshot {
        let signers: BTreeSet<_> = [account(1), account(2), account(3)].into_iter().collect();
        let mut state = VaultState::new(2, signers, account(1), account(100));
        state.tx_count = TxId(1);
        state.transactions.insert(
            TxId(1),
            Transaction::new(TxId(1), 40, account(5), account(6), account(2)),
        );
        VaultSnapshot::from(&state)
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("vault").join("state.json"));

        assert!(store.load().await.unwrap().is_none());

        let saved = snapshot();
        store.save(&saved).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(saved));
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_store_detects_tampering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileSnapshotStore::new(&path);
        store.save(&snapshot()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("\"quorum\": 2", "\"quorum\": 3")).unwrap();

        assert!(matches!(
            store.load().await,
            Err(VaultError::CorruptSnapshot(msg)) if msg.contains("checksum")
        ));
    }

    #[tokio::test]
    async fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileSnapshotStore::new(&path);
        assert!(matches!(store.load().await, Err(VaultError::CorruptSnapshot(_))));
    }

    #[tokio::test]
    async fn test_memory_store_failure_injection() {
        let store = MemorySnapshotStore::new();
        store.fail_saves("disk full");
        assert_eq!(
            store.save(&snapshot()).await,
            Err(VaultError::Storage("disk full".to_string()))
        );
        assert_eq!(store.save_count(), 0);

        store.resume_saves();
        store.save(&snapshot()).await.unwrap();
        assert_eq!(store.save_count(), 1);
        assert!(store.load().await.unwrap().is_some());
    }
}
