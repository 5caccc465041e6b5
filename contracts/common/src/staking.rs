//! Staking State Machine
//!
//! Per-account bookkeeping for time-weighted yield. Every transition here is
//! pure: it takes the current account and returns a staged copy, leaving the
//! caller to commit it once custody and minting have succeeded.
//!
//! ## Transitions
//!
//! - **Settle**: bank yield accrued since the time basis, advance the basis
//! - **Stake**: settle, add principal, restart the window for the new total
//! - **Unstake**: settle, remove principal, restart or clear the window
//! - **Withdraw Yield**: settle, then hand out the whole banked balance
//!
//! Settling first is what lets a partial unstake keep the yield earned on the
//! withdrawn portion while the remaining principal accrues from a fresh basis.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::constants::time::SECONDS_PER_DAY;
use crate::errors::{AmountErrorReason, FluxError, FluxResult};
use crate::math::{accrue_with_carry, elapsed_seconds, safe_add, safe_sub, YieldAccrual};
use crate::types::{Amount, StakeStatus, Timestamp};

// ============================================================================
// Types
// ============================================================================

/// Staking record of one account
///
/// Created implicitly (all zero) on first reference and never deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StakeAccount {
    /// Principal currently staked
    pub principal: Amount,
    /// Start of the current accrual window; `Some` iff `principal > 0`
    pub stake_start_time: Option<Timestamp>,
    /// Reward accrued and banked but not yet minted
    pub pending_yield: Amount,
    /// Sub-unit accrual remainder carried into the next window; zero when idle
    pub yield_carry: u128,
}

/// Staged result of a stake or unstake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeTransition {
    /// Account state to commit
    pub account: StakeAccount,
    /// Yield banked by the settlement step
    pub yield_banked: Amount,
}

/// Staged result of a yield withdrawal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawTransition {
    /// Account state to commit
    pub account: StakeAccount,
    /// Yield banked by the settlement step
    pub yield_banked: Amount,
    /// Reward to mint to the owner
    pub to_mint: Amount,
}

impl StakeAccount {
    /// Create an empty account
    pub fn new() -> Self {
        Self::default()
    }

    /// Idle or Staking, derived from principal
    pub fn status(&self) -> StakeStatus {
        if self.principal > 0 {
            StakeStatus::Staking
        } else {
            StakeStatus::Idle
        }
    }

    /// True iff principal is staked
    pub fn is_staking(&self) -> bool {
        self.status() == StakeStatus::Staking
    }

    /// Seconds in the current accrual window, 0 when idle
    pub fn staking_time(&self, now: Timestamp) -> u64 {
        match (self.is_staking(), self.stake_start_time) {
            (true, Some(start)) => elapsed_seconds(start, now),
            _ => 0,
        }
    }

    /// Yield accrued since the time basis, without banking it
    pub fn accrued_since_start(&self, now: Timestamp) -> FluxResult<YieldAccrual> {
        if !self.is_staking() {
            return Ok(YieldAccrual {
                amount: 0,
                carry: self.yield_carry,
            });
        }
        accrue_with_carry(self.principal, self.staking_time(now), self.yield_carry)
    }

    /// Banked yield plus what settling at `now` would add
    pub fn preview_yield(&self, now: Timestamp) -> FluxResult<Amount> {
        let accrual = self.accrued_since_start(now)?;
        safe_add(self.pending_yield, accrual.amount)
    }

    /// Bank accrued yield and advance the time basis to `now`.
    ///
    /// Returns the amount banked. The basis never moves backwards, so a
    /// clock reading earlier than the basis banks nothing and keeps it.
    pub fn settle(&mut self, now: Timestamp) -> FluxResult<Amount> {
        let accrual = self.accrued_since_start(now)?;
        self.pending_yield = safe_add(self.pending_yield, accrual.amount)?;
        self.yield_carry = accrual.carry;

        self.stake_start_time = match self.stake_start_time {
            Some(start) if self.is_staking() => Some(start.max(now)),
            _ => None,
        };

        Ok(accrual.amount)
    }

    /// Check the record's structural invariants
    pub fn is_consistent(&self) -> bool {
        let window_ok = self.stake_start_time.is_some() == (self.principal > 0);
        let carry_ok = if self.is_staking() {
            self.yield_carry < SECONDS_PER_DAY as u128
        } else {
            self.yield_carry == 0
        };
        window_ok && carry_ok
    }
}

// ============================================================================
// Core Transitions
// ============================================================================

/// Validate a stake amount
pub fn validate_stake(amount: Amount) -> FluxResult<()> {
    if amount == 0 {
        return Err(FluxError::InvalidAmount {
            amount,
            reason: AmountErrorReason::Zero,
        });
    }
    Ok(())
}

/// Validate an unstake amount against the staked principal
pub fn validate_unstake(account: &StakeAccount, amount: Amount) -> FluxResult<()> {
    if amount == 0 {
        return Err(FluxError::InvalidAmount {
            amount,
            reason: AmountErrorReason::Zero,
        });
    }
    if amount > account.principal {
        return Err(FluxError::ExceedsStakedBalance {
            staked: account.principal,
            requested: amount,
        });
    }
    Ok(())
}

/// Stage a stake of `amount` at `now`
pub fn apply_stake(account: &StakeAccount, amount: Amount, now: Timestamp) -> FluxResult<StakeTransition> {
    validate_stake(amount)?;

    let mut staged = account.clone();
    let yield_banked = staged.settle(now)?;

    staged.principal = safe_add(staged.principal, amount)?;
    // The window restarts for the combined principal
    staged.stake_start_time = Some(staged.stake_start_time.unwrap_or(now));

    Ok(StakeTransition {
        account: staged,
        yield_banked,
    })
}

/// Stage an unstake of `amount` at `now`
pub fn apply_unstake(account: &StakeAccount, amount: Amount, now: Timestamp) -> FluxResult<StakeTransition> {
    validate_unstake(account, amount)?;

    let mut staged = account.clone();
    let yield_banked = staged.settle(now)?;

    staged.principal = safe_sub(staged.principal, amount)?;
    if staged.principal == 0 {
        // Idle records are all zero apart from banked yield; the sub-unit
        // remainder of the last window is dropped
        staged.stake_start_time = None;
        staged.yield_carry = 0;
    }

    Ok(StakeTransition {
        account: staged,
        yield_banked,
    })
}

/// Stage a withdrawal of all banked yield at `now`
pub fn apply_withdraw_yield(account: &StakeAccount, now: Timestamp) -> FluxResult<WithdrawTransition> {
    let mut staged = account.clone();
    let yield_banked = staged.settle(now)?;

    let to_mint = staged.pending_yield;
    staged.pending_yield = 0;

    Ok(WithdrawTransition {
        account: staged,
        yield_banked,
        to_mint,
    })
}

// ============================================================================
// Tests
// ============================================================================
