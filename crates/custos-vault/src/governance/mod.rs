//! Governance module - signer set and quorum management
//!
//! This module provides:
//! - Construction-time validation of the signer set and initial quorum
//! - The quorum-update approval flow

pub mod quorum;
pub mod signer_set;

pub use quorum::{QuorumManager, QuorumUpdateOutcome};
pub use signer_set::build_signer_set;
