//! Error Types for Flux Farm
//!
//! Typed errors carrying the values that caused them, so callers can
//! report precise failures without parsing strings.

use core::fmt;

use crate::types::{Address, Amount};

/// Result type alias for Flux Farm operations
pub type FluxResult<T> = Result<T, FluxError>;

/// Main error enum for all Flux Farm errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FluxError {
    // ============ Amount Errors ============
    /// Invalid amount provided
    InvalidAmount { amount: Amount, reason: AmountErrorReason },

    /// Caller does not hold enough principal token
    InsufficientBalance { available: Amount, requested: Amount },

    /// Unstake request larger than the staked principal
    ExceedsStakedBalance { staked: Amount, requested: Amount },

    /// Spender allowance too small for `transfer_from`
    InsufficientAllowance { allowed: Amount, requested: Amount },

    // ============ Collaborator Errors ============
    /// Custody transfer or reward mint failed; ledger state is unchanged
    TransferFailed { from: Address, to: Address, amount: Amount },

    // ============ Authorization Errors ============
    /// Caller lacks the minter role
    MintUnauthorized { caller: Address },

    /// Only an admin can perform this action
    AdminOnly,

    /// Operation not permitted in the current state
    InvalidOperation,

    // ============ Token Errors ============
    /// Mint would push supply past the cap
    SupplyCapExceeded { supply: Amount, requested: Amount, cap: Amount },

    /// Tracked totals disagree with custody
    ConservationViolated { ledger: Amount, custody: Amount },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    // ============ Persistence Errors ============
    /// Snapshot digest does not match its contents
    SnapshotCorrupted { expected: [u8; 32], actual: [u8; 32] },

    /// Snapshot could not be decoded or holds an inconsistent account
    InvalidSnapshot { reason: &'static str },
}

/// Reasons for amount-related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountErrorReason {
    /// Amount is zero when non-zero required
    Zero,
}

impl FluxError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "E010_INVALID_AMOUNT",
            Self::InsufficientBalance { .. } => "E011_INSUFFICIENT_BALANCE",
            Self::ExceedsStakedBalance { .. } => "E012_EXCEEDS_STAKED",
            Self::InsufficientAllowance { .. } => "E013_INSUFFICIENT_ALLOWANCE",
            Self::TransferFailed { .. } => "E020_TRANSFER_FAILED",
            Self::MintUnauthorized { .. } => "E030_MINT_UNAUTH",
            Self::AdminOnly => "E032_ADMIN_ONLY",
            Self::InvalidOperation => "E033_INVALID_OP",
            Self::SupplyCapExceeded { .. } => "E040_SUPPLY_CAP",
            Self::ConservationViolated { .. } => "E041_CONSERVATION",
            Self::Overflow => "E080_OVERFLOW",
            Self::Underflow => "E081_UNDERFLOW",
            Self::SnapshotCorrupted { .. } => "E090_SNAPSHOT_CORRUPTED",
            Self::InvalidSnapshot { .. } => "E091_INVALID_SNAPSHOT",
        }
    }

    /// Returns true if this error is recoverable (user can fix it)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InsufficientBalance { .. } => true,   // Get more funds
            Self::InsufficientAllowance { .. } => true, // Approve more
            Self::ExceedsStakedBalance { .. } => true,  // Unstake less
            Self::TransferFailed { .. } => true,        // Retry later
            _ => false,
        }
    }
}

impl fmt::Display for FluxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount { amount, reason } => {
                write!(f, "{}: amount {} rejected ({:?})", self.code(), amount, reason)
            }
            Self::InsufficientBalance { available, requested } => write!(
                f,
                "{}: requested {} but only {} available",
                self.code(),
                requested,
                available
            ),
            Self::ExceedsStakedBalance { staked, requested } => write!(
                f,
                "{}: requested {} but only {} staked",
                self.code(),
                requested,
                staked
            ),
            Self::InsufficientAllowance { allowed, requested } => write!(
                f,
                "{}: requested {} but allowance is {}",
                self.code(),
                requested,
                allowed
            ),
            Self::TransferFailed { amount, .. } => {
                write!(f, "{}: movement of {} failed", self.code(), amount)
            }
            Self::SupplyCapExceeded { supply, requested, cap } => write!(
                f,
                "{}: supply {} + {} exceeds cap {}",
                self.code(),
                supply,
                requested,
                cap
            ),
            Self::ConservationViolated { ledger, custody } => write!(
                f,
                "{}: ledger tracks {} but custody holds {}",
                self.code(),
                ledger,
                custody
            ),
            Self::InvalidSnapshot { reason } => write!(f, "{}: {}", self.code(), reason),
            _ => f.write_str(self.code()),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FluxError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            FluxError::InvalidAmount { amount: 0, reason: AmountErrorReason::Zero },
            FluxError::InsufficientBalance { available: 1, requested: 2 },
            FluxError::ExceedsStakedBalance { staked: 1, requested: 2 },
            FluxError::InsufficientAllowance { allowed: 1, requested: 2 },
            FluxError::TransferFailed { from: [0u8; 32], to: [1u8; 32], amount: 5 },
            FluxError::MintUnauthorized { caller: [0u8; 32] },
            FluxError::AdminOnly,
            FluxError::InvalidOperation,
            FluxError::SupplyCapExceeded { supply: 1, requested: 2, cap: 2 },
            FluxError::ConservationViolated { ledger: 1, custody: 2 },
            FluxError::Overflow,
            FluxError::Underflow,
            FluxError::SnapshotCorrupted { expected: [0u8; 32], actual: [1u8; 32] },
            FluxError::InvalidSnapshot { reason: "bad" },
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_display_includes_code() {
        let err = FluxError::ExceedsStakedBalance { staked: 5, requested: 7 };
        let rendered = err.to_string();
        assert!(rendered.starts_with("E012_EXCEEDS_STAKED"));
        assert!(rendered.contains('7'));
    }

    #[test]
    fn test_recoverable() {
        assert!(FluxError::InsufficientBalance { available: 0, requested: 1 }.is_recoverable());
        assert!(!FluxError::Overflow.is_recoverable());
    }
}
