//! Mathematical Utilities for Flux Farm
//!
//! Yield accrual and checked arithmetic.
//!
//! Yield is linear in principal and time:
//!
//! ```text
//! yield = principal * elapsed_seconds / SECONDS_PER_DAY
//! ```
//!
//! Staking `P` base units for one full day accrues `P` base units of reward.
//! Principal is split into a multiple of `SECONDS_PER_DAY` and a remainder
//! before multiplying, so any principal up to the supply cap accrues without
//! overflowing `u128`. Integer division floors,
//! so a lone sub-day window on a small principal may accrue zero; the
//! remainder of that division is returned as `carry` so the staking state
//! machine can feed it into the next window and never drop fractional yield.

use crate::constants::time::SECONDS_PER_DAY;
use crate::errors::{FluxError, FluxResult};
use crate::types::{Amount, Timestamp};

/// Result of an accrual computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YieldAccrual {
    /// Whole reward units accrued
    pub amount: Amount,
    /// Undivided remainder, always `< SECONDS_PER_DAY`
    pub carry: u128,
}

/// Accrued reward for `principal` staked over `elapsed_seconds`.
///
/// Pure preview: floors to whole units and has no side effects.
pub fn accrued(principal: Amount, elapsed_seconds: u64) -> FluxResult<Amount> {
    accrue_with_carry(principal, elapsed_seconds, 0).map(|a| a.amount)
}

/// Accrue over a window, folding in the remainder left by earlier windows.
///
/// `carry` must be a value previously returned in [`YieldAccrual::carry`].
pub fn accrue_with_carry(
    principal: Amount,
    elapsed_seconds: u64,
    carry: u128,
) -> FluxResult<YieldAccrual> {
    let period = SECONDS_PER_DAY as u128;
    let elapsed = elapsed_seconds as u128;

    // principal = whole * period + part, so the only product that can grow
    // past u128 is whole * elapsed, and that one overflows only when the
    // accrued amount itself does not fit.
    let whole = principal / period;
    let part = principal % period;

    // part < period, so part * elapsed fits
    let fraction = (part * elapsed)
        .checked_add(carry)
        .ok_or(FluxError::Overflow)?;

    let amount = whole
        .checked_mul(elapsed)
        .ok_or(FluxError::Overflow)?
        .checked_add(fraction / period)
        .ok_or(FluxError::Overflow)?;

    Ok(YieldAccrual {
        amount,
        carry: fraction % period,
    })
}

/// Seconds between `start` and `now`, clamped at zero if the clock reads
/// earlier than `start`.
pub fn elapsed_seconds(start: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(start)
}

/// Safe addition with overflow check
pub fn safe_add(a: Amount, b: Amount) -> FluxResult<Amount> {
    a.checked_add(b).ok_or(FluxError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: Amount, b: Amount) -> FluxResult<Amount> {
    a.checked_sub(b).ok_or(FluxError::Underflow)
}
