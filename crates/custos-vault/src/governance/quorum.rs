//! Quorum management and the quorum-update approval flow

use custos_common::{AccountId, PendingQuorumUpdate, Result, VaultError, MIN_QUORUM};
use serde::{Deserialize, Serialize};

use crate::state::VaultState;

/// Result of an accepted quorum-update call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuorumUpdateOutcome {
    /// Approval recorded; the change still needs more signers
    Pending {
        proposed: u32,
        approvals: usize,
        required: u32,
    },
    /// Approvals reached the prior quorum and the change took effect
    Applied { previous: u32, current: u32 },
}

/// Manages the quorum threshold of one vault state
pub struct QuorumManager<'a> {
    state: &'a mut VaultState,
}

impl<'a> QuorumManager<'a> {
    pub fn new(state: &'a mut VaultState) -> Self {
        Self { state }
    }

    /// Quorum in force
    pub fn threshold(&self) -> u32 {
        self.state.quorum
    }

    /// Number of signers able to approve
    pub fn total(&self) -> usize {
        self.state.signers.len()
    }

    /// Check that `proposed` keeps the signer-set invariant
    pub fn validate_target(&self, proposed: u32) -> Result<()> {
        if proposed < MIN_QUORUM {
            return Err(VaultError::QuorumTooSmall {
                quorum: proposed,
                minimum: MIN_QUORUM,
            });
        }
        if proposed as usize > self.total() {
            return Err(VaultError::QuorumExceedsSigners {
                quorum: proposed,
                signers: self.total(),
            });
        }
        Ok(())
    }

    /// Record `approver`'s vote for changing the quorum to `proposed`
    ///
    /// The caller must be the approver and a current signer. A proposal for
    /// a different value while one is pending is rejected and leaves the
    /// pending proposal untouched. The change commits once approvals reach
    /// the quorum in force before the change.
    pub fn approve_update(
        &mut self,
        caller: AccountId,
        proposed: u32,
        approver: AccountId,
    ) -> Result<QuorumUpdateOutcome> {
        if caller != approver {
            return Err(VaultError::InvalidSigner(caller));
        }
        self.state.require_signer(&approver)?;
        self.validate_target(proposed)?;

        let current = self.state.quorum;
        let approvals = match self.state.pending_quorum_update.as_mut() {
            Some(pending) if pending.proposed_quorum != proposed => {
                return Err(VaultError::ConflictingQuorumProposal {
                    pending: pending.proposed_quorum,
                    proposed,
                });
            }
            Some(pending) => {
                if !pending.record_approval(approver) {
                    return Err(VaultError::DuplicateApproval { approver });
                }
                pending.approval_count()
            }
            None => {
                self.state.pending_quorum_update = Some(PendingQuorumUpdate::new(proposed, approver));
                1
            }
        };

        if approvals >= current as usize {
            self.state.quorum = proposed;
            self.state.pending_quorum_update = None;
            Ok(QuorumUpdateOutcome::Applied {
                previous: current,
                current: proposed,
            })
        } else {
            Ok(QuorumUpdateOutcome::Pending {
                proposed,
                approvals,
                required: current,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    fn state(quorum: u32, signer_count: u8) -> VaultState {
        let signers: BTreeSet<_> = (1..=signer_count).map(account).collect();
        VaultState::new(quorum, signers, account(1), account(100))
    }

    #[test]
    fn test_two_approvals_raise_quorum() {
        let mut s = state(2, 3);

        let outcome = QuorumManager::new(&mut s)
            .approve_update(account(1), 3, account(1))
            .unwrap();
        assert_eq!(
            outcome,
            QuorumUpdateOutcome::Pending {
                proposed: 3,
                approvals: 1,
                required: 2
            }
        );
        assert_eq!(s.pending_quorum_update.as_ref().unwrap().approval_count(), 1);

        let outcome = QuorumManager::new(&mut s)
            .approve_update(account(2), 3, account(2))
            .unwrap();
        assert_eq!(outcome, QuorumUpdateOutcome::Applied { previous: 2, current: 3 });
        assert_eq!(s.quorum, 3);
        assert!(s.pending_quorum_update.is_none());
    }

    #[test]
    fn test_commit_uses_prior_quorum() {
        // Lowering 3 -> 2 still needs three approvals
        let mut s = state(3, 4);
        for n in 1..=2 {
            let outcome = QuorumManager::new(&mut s)
                .approve_update(account(n), 2, account(n))
                .unwrap();
            assert!(matches!(outcome, QuorumUpdateOutcome::Pending { .. }));
        }
        let outcome = QuorumManager::new(&mut s)
            .approve_update(account(3), 2, account(3))
            .unwrap();
        assert_eq!(outcome, QuorumUpdateOutcome::Applied { previous: 3, current: 2 });
    }

    #[test]
    fn test_caller_must_match_approver() {
        let mut s = state(2, 3);
        let result = QuorumManager::new(&mut s).approve_update(account(1), 3, account(2));
        assert_eq!(result, Err(VaultError::InvalidSigner(account(1))));
        assert!(s.pending_quorum_update.is_none());
    }

    #[test]
    fn test_non_signer_rejected() {
        let mut s = state(2, 3);
        let result = QuorumManager::new(&mut s).approve_update(account(9), 3, account(9));
        assert_eq!(result, Err(VaultError::InvalidSigner(account(9))));
    }

    #[test]
    fn test_duplicate_quorum_approval() {
        let mut s = state(3, 3);
        QuorumManager::new(&mut s)
            .approve_update(account(1), 2, account(1))
            .unwrap();
        let result = QuorumManager::new(&mut s).approve_update(account(1), 2, account(1));
        assert_eq!(result, Err(VaultError::DuplicateApproval { approver: account(1) }));
        assert_eq!(s.pending_quorum_update.as_ref().unwrap().approval_count(), 1);
    }

    #[test]
    fn test_conflicting_proposal_rejected() {
        let mut s = state(3, 4);
        QuorumManager::new(&mut s)
            .approve_update(account(1), 4, account(1))
            .unwrap();

        let result = QuorumManager::new(&mut s).approve_update(account(2), 2, account(2));
        assert_eq!(
            result,
            Err(VaultError::ConflictingQuorumProposal {
                pending: 4,
                proposed: 2
            })
        );

        let pending = s.pending_quorum_update.as_ref().unwrap();
        assert_eq!(pending.proposed_quorum, 4);
        assert!(!pending.has_approved(&account(2)));
    }

    #[test]
    fn test_target_out_of_range() {
        let mut s = state(2, 3);
        assert!(matches!(
            QuorumManager::new(&mut s).approve_update(account(1), 1, account(1)),
            Err(VaultError::QuorumTooSmall { .. })
        ));
        assert!(matches!(
            QuorumManager::new(&mut s).approve_update(account(1), 4, account(1)),
            Err(VaultError::QuorumExceedsSigners { quorum: 4, signers: 3 })
        ));
        assert!(s.pending_quorum_update.is_none());
    }
}
