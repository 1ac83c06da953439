//! Signer set construction
//!
//! The creator is folded into the signer set by union, so every later
//! authorization check is a plain membership test.

use std::collections::BTreeSet;

use custos_common::{AccountId, Result, VaultError, MIN_CANDIDATE_SIGNERS, MIN_QUORUM};

/// Validate construction parameters and build the signer set
///
/// Checks run in a fixed order and the first failure wins:
/// quorum floor, candidate count, null signers, duplicate candidates, and
/// finally quorum against the distinct signer count (creator included).
pub fn build_signer_set(
    creator: AccountId,
    quorum: u32,
    candidates: &[AccountId],
) -> Result<BTreeSet<AccountId>> {
    if quorum < MIN_QUORUM {
        return Err(VaultError::QuorumTooSmall {
            quorum,
            minimum: MIN_QUORUM,
        });
    }

    if candidates.len() < MIN_CANDIDATE_SIGNERS {
        return Err(VaultError::InsufficientSigners {
            provided: candidates.len(),
            minimum: MIN_CANDIDATE_SIGNERS,
        });
    }

    if let Some(position) = candidates.iter().position(AccountId::is_null) {
        return Err(VaultError::NullSigner { position });
    }
    if creator.is_null() {
        return Err(VaultError::NullSigner {
            position: candidates.len(),
        });
    }

    let mut signers = BTreeSet::new();
    for candidate in candidates {
        if !signers.insert(*candidate) {
            return Err(VaultError::DuplicateSigner(*candidate));
        }
    }
    signers.insert(creator);

    if quorum as usize > signers.len() {
        return Err(VaultError::QuorumExceedsSigners {
            quorum,
            signers: signers.len(),
        });
    }

    Ok(signers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    #[test]
    fn test_creator_joins_signer_set() {
        let signers = build_signer_set(account(1), 2, &[account(2), account(3)]).unwrap();
        assert_eq!(signers.len(), 3);
        assert!(signers.contains(&account(1)));
    }

    #[test]
    fn test_quorum_may_count_creator() {
        // Two candidates plus the creator satisfy a quorum of three
        let signers = build_signer_set(account(1), 3, &[account(2), account(3)]).unwrap();
        assert_eq!(signers.len(), 3);
    }

    #[test]
    fn test_quorum_too_small() {
        let result = build_signer_set(account(1), 1, &[account(2), account(3), account(4)]);
        assert_eq!(
            result,
            Err(VaultError::QuorumTooSmall {
                quorum: 1,
                minimum: 2
            })
        );
    }

    #[test]
    fn test_too_few_candidates() {
        let result = build_signer_set(account(1), 2, &[account(2)]);
        assert!(matches!(result, Err(VaultError::InsufficientSigners { provided: 1, .. })));
    }

    #[test]
    fn test_null_candidate() {
        let result = build_signer_set(account(1), 3, &[AccountId::NULL, account(2), account(3)]);
        assert_eq!(result, Err(VaultError::NullSigner { position: 0 }));
    }

    #[test]
    fn test_null_creator() {
        let result = build_signer_set(AccountId::NULL, 2, &[account(2), account(3)]);
        assert!(matches!(result, Err(VaultError::NullSigner { .. })));
    }

    #[test]
    fn test_duplicate_candidate() {
        let result = build_signer_set(account(1), 2, &[account(2), account(3), account(2)]);
        assert_eq!(result, Err(VaultError::DuplicateSigner(account(2))));
    }

    #[test]
    fn test_creator_listed_as_candidate_is_not_duplicate() {
        let signers = build_signer_set(account(1), 2, &[account(1), account(2)]).unwrap();
        assert_eq!(signers.len(), 2);
    }

    #[test]
    fn test_quorum_exceeds_signers() {
        let result = build_signer_set(account(1), 5, &[account(2), account(3), account(4)]);
        assert_eq!(
            result,
            Err(VaultError::QuorumExceedsSigners {
                quorum: 5,
                signers: 4
            })
        );

        let result = build_signer_set(account(1), 7, &[account(2), account(3), account(4)]);
        assert!(matches!(result, Err(VaultError::QuorumExceedsSigners { .. })));
    }
}
