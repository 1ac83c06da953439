//! Transfer proposals
//!
//! Proposal creation is split around the balance query: the synchronous
//! checks run first, the caller then asks the asset ledger for the vault's
//! balance, and only [`record_proposal`] mutates state.

use custos_common::{AccountId, Result, Transaction, TxId, VaultError};

use crate::state::VaultState;

/// Transfer request as submitted by a signer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub caller: AccountId,
    pub amount: u128,
    pub recipient: AccountId,
    pub asset_ledger: AccountId,
}

/// Checks that need no ledger access, in order:
/// signer membership, zero amount, null recipient, null ledger.
pub fn validate_request(state: &VaultState, request: &TransferRequest) -> Result<()> {
    state.require_signer(&request.caller)?;

    if request.amount == 0 {
        return Err(VaultError::ZeroAmount);
    }
    if request.recipient.is_null() {
        return Err(VaultError::NullAddress { field: "recipient" });
    }
    if request.asset_ledger.is_null() {
        return Err(VaultError::NullAddress {
            field: "asset_ledger",
        });
    }

    Ok(())
}

/// Create the transaction once the vault's ledger balance is known
///
/// Nothing is recorded when `available` does not cover the amount.
pub fn record_proposal(
    state: &mut VaultState,
    request: &TransferRequest,
    available: u128,
) -> Result<TxId> {
    if available < request.amount {
        return Err(VaultError::InsufficientFunds {
            required: request.amount,
            available,
        });
    }

    let id = state.tx_count.next();
    let tx = Transaction::new(
        id,
        request.amount,
        request.recipient,
        request.asset_ledger,
        request.caller,
    );

    state.tx_count = id;
    state.transactions.insert(id, tx);
    Ok(id)
}
