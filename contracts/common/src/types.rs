//! Core Types for Flux Farm
//!
//! Fundamental aliases and small data structures shared by every crate.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Type alias for account addresses (32-byte hash)
pub type Address = [u8; 32];

/// Token amount in base units (18 decimals)
pub type Amount = u128;

/// Seconds since an arbitrary epoch supplied by the clock
pub type Timestamp = u64;

/// The all-zero address, never a valid account
pub const ZERO_ADDRESS: Address = [0u8; 32];

/// Derive a deterministic address from a human-readable label
pub fn derive_address(label: &str) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(b"flux-farm/address");
    hasher.update(label.as_bytes());
    let result = hasher.finalize();
    let mut address = [0u8; 32];
    address.copy_from_slice(&result);
    address
}

// ============ Staking Types ============

/// Staking state of a single account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum StakeStatus {
    /// No principal staked
    #[default]
    Idle,
    /// Principal is staked and accruing
    Staking,
}

/// Actions accepted by the farm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum FarmAction {
    /// Deposit principal
    Stake { amount: Amount },
    /// Return principal to the owner
    Unstake { amount: Amount },
    /// Mint all banked reward to the owner
    WithdrawYield,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_address_deterministic() {
        let a = derive_address("alice");
        assert_eq!(a, derive_address("alice"));
        assert_ne!(a, derive_address("bob"));
        assert_ne!(a, ZERO_ADDRESS);
    }
}
