//! AccountId - fixed-length opaque account identifier
//!
//! Identifies signers, recipients, asset ledgers, and the vault's own
//! account. The all-zero value is reserved as [`AccountId::NULL`] and is
//! never a valid signer, recipient, or ledger reference.
//!
//! Textual form is `0x` followed by 40 lowercase hex digits.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Account identifier length in bytes
pub const ACCOUNT_ID_LEN: usize = 20;

/// Opaque account identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The reserved "no account" identifier
    pub const NULL: AccountId = AccountId([0u8; ACCOUNT_ID_LEN]);

    /// Create an identifier from raw bytes
    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Create an identifier from a byte slice of exactly [`ACCOUNT_ID_LEN`] bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AccountIdError> {
        let array: [u8; ACCOUNT_ID_LEN] =
            bytes
                .try_into()
                .map_err(|_| AccountIdError::InvalidLength {
                    expected: ACCOUNT_ID_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Raw identifier bytes
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }

    /// Check if this is the reserved null identifier
    #[inline]
    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Encode as `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without the `0x` prefix
    pub fn parse(s: &str) -> Result<Self, AccountIdError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let bytes = hex::decode(digits).map_err(|_| AccountIdError::InvalidHex)?;
        Self::from_slice(&bytes)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::fmt::Debug for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl std::str::FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Errors related to AccountId parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    #[error("Invalid hex encoding")]
    InvalidHex,

    #[error("Invalid account id length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}
