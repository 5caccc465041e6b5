//! Collaborator Interfaces
//!
//! The staking ledger never moves tokens itself. Custody of principal goes
//! through a [`TokenVault`] and reward issuance through a [`RewardMinter`],
//! both injected at construction. Each call either fully succeeds or fails
//! with no effect.

use crate::errors::FluxResult;
use crate::types::{Address, Amount};

/// Custody of the principal token on behalf of the ledger
pub trait TokenVault {
    /// Principal the account currently holds and could deposit
    fn available(&self, account: &Address) -> Amount;

    /// Total principal held in custody for the ledger
    fn custody_balance(&self) -> Amount;

    /// Move `amount` from the account into custody
    fn transfer_in(&mut self, account: &Address, amount: Amount) -> FluxResult<()>;

    /// Move `amount` from custody back to the account
    fn transfer_out(&mut self, account: &Address, amount: Amount) -> FluxResult<()>;
}

/// Capability to issue reward tokens
pub trait RewardMinter {
    /// Mint `amount` reward tokens to `to`
    fn mint(&mut self, to: &Address, amount: Amount) -> FluxResult<()>;
}
