//! Snapshot persistence
//!
//! A vault with a [`SnapshotStore`] attached saves its full state after
//! every accepted mutation and can be resumed from the last save with
//! [`crate::MultisigVault::restore`].

pub mod snapshot;

pub use snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
