//! ERC-20 Style Principal Token
//!
//! Plain fungible token with an allowance flow. `mint` is open to anyone,
//! which makes it a faucet for test deployments of the staked stablecoin.

use flux_common::{
    constants::principal_token,
    errors::FluxResult,
    events::{EventLog, FluxEvent},
    token_ops::TokenLedger,
    types::{Address, Amount},
};

use crate::TokenMetadata;

/// ERC-20 style token state
#[derive(Debug, Clone)]
pub struct Erc20 {
    metadata: TokenMetadata,
    ledger: TokenLedger,
    events: EventLog,
}

impl Erc20 {
    /// Deploy a token with the given name and symbol
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            metadata: TokenMetadata::new(name, symbol, principal_token::DECIMALS),
            ledger: TokenLedger::new(),
            events: EventLog::new(),
        }
    }

    /// The default staked stablecoin
    pub fn mock_dai() -> Self {
        Self::new(principal_token::NAME, principal_token::SYMBOL)
    }

    /// Token name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Token symbol
    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    /// Token metadata
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Balance of `owner`
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.ledger.balance_of(owner)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    /// Remaining allowance of `spender` over `owner`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.ledger.allowance(owner, spender)
    }

    /// Faucet mint
    pub fn mint(&mut self, to: &Address, amount: Amount) -> FluxResult<Amount> {
        let new_total_supply = self.ledger.mint(to, amount)?;
        self.events.emit(FluxEvent::TokenMint {
            to: *to,
            amount,
            new_total_supply,
        });
        Ok(new_total_supply)
    }

    /// Allow `spender` to move up to `amount` of `owner`'s tokens
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        self.ledger.approve(owner, spender, amount);
        self.events.emit(FluxEvent::TokenApproval {
            owner: *owner,
            spender: *spender,
            amount,
        });
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> FluxResult<()> {
        self.ledger.transfer(from, to, amount)?;
        self.emit_transfer(from, to, amount);
        Ok(())
    }

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> FluxResult<()> {
        self.ledger.transfer_from(spender, from, to, amount)?;
        self.emit_transfer(from, to, amount);
        Ok(())
    }

    fn emit_transfer(&mut self, from: &Address, to: &Address, amount: Amount) {
        self.events.emit(FluxEvent::TokenTransfer {
            from: *from,
            to: *to,
            amount,
        });
    }

    /// Events emitted so far
    pub fn events(&self) -> &EventLog {
        &self.events
    }
}
