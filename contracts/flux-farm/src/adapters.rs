//! Token Adapters
//!
//! Bind the ledger's collaborator traits to the concrete token contracts.
//! The escrow address holds staked principal and is the spender stakers
//! approve; the same address holds the reward token's minter role.

use flux_common::{
    errors::FluxResult,
    interfaces::{RewardMinter, TokenVault},
    types::{Address, Amount},
};
use flux_token::{Erc20, FluxToken};

/// Principal custody backed by an [`Erc20`] token
#[derive(Debug, Clone)]
pub struct EscrowVault {
    token: Erc20,
    escrow: Address,
}

impl EscrowVault {
    /// Custody `token` under `escrow`
    pub fn new(token: Erc20, escrow: Address) -> Self {
        Self { token, escrow }
    }

    /// Underlying token
    pub fn token(&self) -> &Erc20 {
        &self.token
    }

    /// Underlying token, for faucet mints and approvals
    pub fn token_mut(&mut self) -> &mut Erc20 {
        &mut self.token
    }

    /// Custody address
    pub fn escrow(&self) -> Address {
        self.escrow
    }
}

impl TokenVault for EscrowVault {
    fn available(&self, account: &Address) -> Amount {
        self.token.balance_of(account)
    }

    fn custody_balance(&self) -> Amount {
        self.token.balance_of(&self.escrow)
    }

    fn transfer_in(&mut self, account: &Address, amount: Amount) -> FluxResult<()> {
        // Requires a prior approve(account, escrow, >= amount)
        self.token.transfer_from(&self.escrow, account, &self.escrow, amount)
    }

    fn transfer_out(&mut self, account: &Address, amount: Amount) -> FluxResult<()> {
        self.token.transfer(&self.escrow, account, amount)
    }
}

/// Reward issuance through a [`FluxToken`] minter role
#[derive(Debug, Clone)]
pub struct FluxMinter {
    token: FluxToken,
    minter: Address,
}

impl FluxMinter {
    /// Mint on `token` as `minter`
    pub fn new(token: FluxToken, minter: Address) -> Self {
        Self { token, minter }
    }

    /// Underlying token
    pub fn token(&self) -> &FluxToken {
        &self.token
    }

    /// Underlying token, for role management
    pub fn token_mut(&mut self) -> &mut FluxToken {
        &mut self.token
    }
}

impl RewardMinter for FluxMinter {
    fn mint(&mut self, to: &Address, amount: Amount) -> FluxResult<()> {
        self.token.mint(&self.minter, to, amount).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_common::access_control::Role;
    use flux_common::errors::FluxError;

    const ESCROW: Address = [9u8; 32];
    const ALICE: Address = [1u8; 32];
    const ADMIN: Address = [7u8; 32];

    #[test]
    fn test_vault_round_trip() {
        let mut vault = EscrowVault::new(Erc20::mock_dai(), ESCROW);
        vault.token_mut().mint(&ALICE, 100).unwrap();
        vault.token_mut().approve(&ALICE, &ESCROW, 40);

        vault.transfer_in(&ALICE, 40).unwrap();
        assert_eq!(vault.available(&ALICE), 60);
        assert_eq!(vault.custody_balance(), 40);

        vault.transfer_out(&ALICE, 15).unwrap();
        assert_eq!(vault.available(&ALICE), 75);
        assert_eq!(vault.custody_balance(), 25);
    }

    #[test]
    fn test_vault_needs_approval() {
        let mut vault = EscrowVault::new(Erc20::mock_dai(), ESCROW);
        vault.token_mut().mint(&ALICE, 100).unwrap();

        assert!(matches!(
            vault.transfer_in(&ALICE, 1),
            Err(FluxError::InsufficientAllowance { .. })
        ));
        assert_eq!(vault.custody_balance(), 0);
    }

    #[test]
    fn test_minter_requires_role() {
        let mut minter = FluxMinter::new(FluxToken::new(ADMIN), ESCROW);
        assert!(matches!(
            minter.mint(&ALICE, 5),
            Err(FluxError::MintUnauthorized { .. })
        ));

        minter.token_mut().grant_role(ADMIN, ESCROW, Role::Minter).unwrap();
        minter.mint(&ALICE, 5).unwrap();
        assert_eq!(minter.token().balance_of(&ALICE), 5);
    }
}
