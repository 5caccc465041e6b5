//! Token Operations Module
//!
//! In-memory fungible token ledger shared by the reward token and the
//! principal token. Every operation validates fully before touching any
//! balance, so a failed call leaves the ledger unchanged.
//!
//! ## Key Features
//!
//! - **Balances**: Per-address balances, zero entries pruned
//! - **Allowances**: `approve` / `transfer_from` spending flow
//! - **Supply Tracking**: Total, cumulative minted and burned
//! - **Supply Cap**: Mints beyond [`MAX_SUPPLY`] are rejected

use crate::{BTreeMap, FluxError, FluxResult};
use crate::errors::AmountErrorReason;
use crate::constants::supply::MAX_SUPPLY;
use crate::math::{safe_add, safe_sub};
use crate::types::{Address, Amount};

// ============================================================================
// Types
// ============================================================================

/// Token supply state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSupply {
    /// Current total supply
    pub total_supply: Amount,
    /// Total minted (cumulative)
    pub total_minted: Amount,
    /// Total burned (cumulative)
    pub total_burned: Amount,
}

impl TokenSupply {
    /// Create new supply tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if mint would stay within max supply
    pub fn can_mint(&self, amount: Amount) -> bool {
        self.total_supply
            .checked_add(amount)
            .is_some_and(|total| total <= MAX_SUPPLY)
    }

    /// Calculate circulating supply
    pub fn circulating(&self) -> Amount {
        self.total_minted.saturating_sub(self.total_burned)
    }
}

/// Balances, allowances and supply of one token
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    balances: BTreeMap<Address, Amount>,
    allowances: BTreeMap<(Address, Address), Amount>,
    supply: TokenSupply,
}

// ============================================================================
// Core Token Functions
// ============================================================================

fn require_non_zero(amount: Amount) -> FluxResult<()> {
    if amount == 0 {
        return Err(FluxError::InvalidAmount {
            amount,
            reason: AmountErrorReason::Zero,
        });
    }
    Ok(())
}

impl TokenLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `owner`
    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Current total supply
    pub fn total_supply(&self) -> Amount {
        self.supply.total_supply
    }

    /// Supply statistics
    pub fn supply(&self) -> &TokenSupply {
        &self.supply
    }

    /// Number of addresses with a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    fn set_balance(&mut self, owner: Address, balance: Amount) {
        if balance == 0 {
            self.balances.remove(&owner);
        } else {
            self.balances.insert(owner, balance);
        }
    }

    /// Move `amount` from `from` to `to`
    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> FluxResult<()> {
        require_non_zero(amount)?;

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(FluxError::InsufficientBalance {
                available: from_balance,
                requested: amount,
            });
        }

        if from == to {
            return Ok(());
        }

        let new_to = safe_add(self.balance_of(to), amount)?;
        self.set_balance(*from, from_balance - amount);
        self.set_balance(*to, new_to);
        Ok(())
    }

    /// Set the allowance of `spender` over `owner`'s balance
    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> FluxResult<()> {
        require_non_zero(amount)?;

        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(FluxError::InsufficientAllowance {
                allowed,
                requested: amount,
            });
        }

        self.transfer(from, to, amount)?;
        self.approve(from, spender, allowed - amount);
        Ok(())
    }

    /// Create `amount` new tokens for `to`, returning the new total supply
    pub fn mint(&mut self, to: &Address, amount: Amount) -> FluxResult<Amount> {
        require_non_zero(amount)?;

        if !self.supply.can_mint(amount) {
            return Err(FluxError::SupplyCapExceeded {
                supply: self.supply.total_supply,
                requested: amount,
                cap: MAX_SUPPLY,
            });
        }

        let new_balance = safe_add(self.balance_of(to), amount)?;
        let new_minted = safe_add(self.supply.total_minted, amount)?;

        self.set_balance(*to, new_balance);
        self.supply.total_supply += amount;
        self.supply.total_minted = new_minted;
        Ok(self.supply.total_supply)
    }

    /// Destroy `amount` tokens held by `from`, returning the new total supply
    pub fn burn(&mut self, from: &Address, amount: Amount) -> FluxResult<Amount> {
        require_non_zero(amount)?;

        let balance = self.balance_of(from);
        if balance < amount {
            return Err(FluxError::InsufficientBalance {
                available: balance,
                requested: amount,
            });
        }

        let new_supply = safe_sub(self.supply.total_supply, amount)?;
        self.set_balance(*from, balance - amount);
        self.supply.total_supply = new_supply;
        self.supply.total_burned = self.supply.total_burned.saturating_add(amount);
        Ok(new_supply)
    }

    /// Verify that balances sum to the tracked supply
    pub fn verify_conservation(&self) -> FluxResult<()> {
        let held = self
            .balances
            .values()
            .try_fold(0u128, |acc, b| acc.checked_add(*b))
            .ok_or(FluxError::Overflow)?;

        if held != self.supply.total_supply {
            return Err(FluxError::ConservationViolated {
                ledger: self.supply.total_supply,
                custody: held,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
