//! Core data types for the Custos vault

pub mod account_id;
pub mod quorum_update;
pub mod transaction;
