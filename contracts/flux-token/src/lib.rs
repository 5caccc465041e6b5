//! FluxToken Contract
//!
//! Reward token of Flux Farm. Anyone can hold and transfer it; only
//! addresses holding the `Minter` role can create it. The deployer holds
//! `DefaultAdmin` and decides who mints, typically granting the role to the
//! farm's escrow address.
//!
//! The [`erc20`] module provides the plain ERC-20 style token used as the
//! staked principal.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub mod erc20;

pub use erc20::Erc20;

use flux_common::{
    access_control::{self, AccessControlState, Role},
    constants::reward_token,
    errors::{FluxError, FluxResult},
    events::{EventLog, FluxEvent},
    token_ops::{TokenLedger, TokenSupply},
    types::{Address, Amount},
};

// ============ Token Metadata ============

/// Static description of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct TokenMetadata {
    /// Token name
    pub name: String,
    /// Token symbol
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
}

impl TokenMetadata {
    /// Build metadata from parts
    pub fn new(name: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
        }
    }
}

/// Operations accepted by [`FluxToken::execute`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum TokenAction {
    /// Move tokens owned by the caller
    Transfer { to: Address, amount: Amount },
    /// Create tokens (minter only)
    Mint { to: Address, amount: Amount },
    /// Grant a role (admin only)
    GrantRole { account: Address, role: Role },
    /// Revoke a role (admin only)
    RevokeRole { account: Address, role: Role },
}

// ============ Token State ============

/// FluxToken state
#[derive(Debug, Clone)]
pub struct FluxToken {
    ledger: TokenLedger,
    access: AccessControlState,
    events: EventLog,
}

impl FluxToken {
    /// Deploy the token with `admin` as default admin
    pub fn new(admin: Address) -> Self {
        Self {
            ledger: TokenLedger::new(),
            access: AccessControlState::new(admin),
            events: EventLog::new(),
        }
    }

    /// Get token name
    pub fn name() -> &'static str {
        reward_token::NAME
    }

    /// Get token symbol
    pub fn symbol() -> &'static str {
        reward_token::SYMBOL
    }

    /// Get token decimals
    pub fn decimals() -> u8 {
        reward_token::DECIMALS
    }

    /// Token metadata
    pub fn metadata() -> TokenMetadata {
        TokenMetadata::new(Self::name(), Self::symbol(), Self::decimals())
    }

    /// Identifier of the minter role
    pub fn minter_role() -> [u8; 32] {
        Role::Minter.id()
    }

    /// Identifier of the admin role
    pub fn default_admin_role() -> [u8; 32] {
        Role::DefaultAdmin.id()
    }

    /// Balance of `owner`
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.ledger.balance_of(owner)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Supply statistics
    pub fn supply(&self) -> &TokenSupply {
        self.ledger.supply()
    }

    /// Check whether `account` holds `role`
    pub fn has_role(&self, account: &Address, role: Role) -> bool {
        access_control::has_role(&self.access, account, role)
    }

    /// Grant `role` to `account`; `caller` must be admin
    pub fn grant_role(&mut self, caller: Address, account: Address, role: Role) -> FluxResult<()> {
        if access_control::grant_role(&mut self.access, caller, account, role)? {
            self.events.emit(FluxEvent::RoleGranted {
                role,
                account,
                granted_by: caller,
            });
        }
        Ok(())
    }

    /// Revoke `role` from `account`; `caller` must be admin
    pub fn revoke_role(&mut self, caller: Address, account: Address, role: Role) -> FluxResult<()> {
        if access_control::revoke_role(&mut self.access, caller, account, role)? {
            self.events.emit(FluxEvent::RoleRevoked {
                role,
                account,
                revoked_by: caller,
            });
        }
        Ok(())
    }

    /// Mint `amount` to `to`; `caller` must hold the minter role
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: Amount) -> FluxResult<Amount> {
        if !self.has_role(caller, Role::Minter) {
            return Err(FluxError::MintUnauthorized { caller: *caller });
        }

        let new_total_supply = self.ledger.mint(to, amount)?;

        self.events.emit(FluxEvent::TokenMint {
            to: *to,
            amount,
            new_total_supply,
        });

        Ok(new_total_supply)
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> FluxResult<()> {
        self.ledger.transfer(from, to, amount)?;

        self.events.emit(FluxEvent::TokenTransfer {
            from: *from,
            to: *to,
            amount,
        });

        Ok(())
    }

    /// Main entry point dispatching a [`TokenAction`] issued by `caller`
    pub fn execute(&mut self, caller: Address, action: &TokenAction) -> FluxResult<()> {
        match action {
            TokenAction::Transfer { to, amount } => self.transfer(&caller, to, *amount),
            TokenAction::Mint { to, amount } => self.mint(&caller, to, *amount).map(|_| ()),
            TokenAction::GrantRole { account, role } => self.grant_role(caller, *account, *role),
            TokenAction::RevokeRole { account, role } => self.revoke_role(caller, *account, *role),
        }
    }

    /// Events emitted so far
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drain emitted events
    pub fn take_events(&mut self) -> EventLog {
        core::mem::take(&mut self.events)
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use flux_common::events::EventType;

    const ONE: Amount = reward_token::ONE;

    fn admin() -> Address {
        [1u8; 32]
    }

    fn farm() -> Address {
        [2u8; 32]
    }

    fn user() -> Address {
        [3u8; 32]
    }

    fn token_with_minter() -> FluxToken {
        let mut token = FluxToken::new(admin());
        token.grant_role(admin(), farm(), Role::Minter).unwrap();
        token
    }

    #[test]
    fn test_metadata() {
        assert_eq!(FluxToken::name(), "FluxToken");
        assert_eq!(FluxToken::decimals(), 18);
        assert_eq!(FluxToken::metadata().symbol, "FLUX");
        assert_eq!(FluxToken::default_admin_role(), [0u8; 32]);
        assert_ne!(FluxToken::minter_role(), FluxToken::default_admin_role());
    }

    #[test]
    fn test_mint_authorized() {
        let mut token = token_with_minter();

        let supply = token.mint(&farm(), &user(), 20 * ONE).unwrap();

        assert_eq!(supply, 20 * ONE);
        assert_eq!(token.balance_of(&user()), 20 * ONE);
        assert_eq!(token.events().filter_by_type(EventType::TokenMint).len(), 1);
    }

    #[test]
    fn test_mint_unauthorized() {
        let mut token = FluxToken::new(admin());

        // Even the admin cannot mint without the role
        let result = token.mint(&admin(), &user(), ONE);
        assert_eq!(result, Err(FluxError::MintUnauthorized { caller: admin() }));
        assert_eq!(token.total_supply(), 0);
    }

    #[test]
    fn test_revoked_minter_cannot_mint() {
        let mut token = token_with_minter();
        token.revoke_role(admin(), farm(), Role::Minter).unwrap();

        assert!(!token.has_role(&farm(), Role::Minter));
        assert!(matches!(
            token.mint(&farm(), &user(), ONE),
            Err(FluxError::MintUnauthorized { .. })
        ));
        assert_eq!(token.events().filter_by_type(EventType::RoleRevoked).len(), 1);
    }

    #[test]
    fn test_grant_requires_admin() {
        let mut token = FluxToken::new(admin());
        let result = token.grant_role(user(), user(), Role::Minter);
        assert_eq!(result, Err(FluxError::AdminOnly));
        assert!(token.events().is_empty());
    }

    #[test]
    fn test_execute_dispatch() {
        let mut token = token_with_minter();

        token
            .execute(farm(), &TokenAction::Mint { to: user(), amount: 5 * ONE })
            .unwrap();
        token
            .execute(user(), &TokenAction::Transfer { to: admin(), amount: 2 * ONE })
            .unwrap();

        assert_eq!(token.balance_of(&user()), 3 * ONE);
        assert_eq!(token.balance_of(&admin()), 2 * ONE);

        let events = token.take_events();
        // grant + mint + transfer
        assert_eq!(events.len(), 3);
        assert!(token.events().is_empty());
    }
}
