//! Flux Farm Common Library
//!
//! Shared types, constants, and utilities for the Flux Farm contracts.
//! This crate holds everything that does not depend on a concrete
//! custody or minting backend.
//!
//! ## Layout
//!
//! - **Yield Math**: Linear accrual `principal * elapsed / 1 day`, exact carry
//! - **Staking State Machine**: Per-account settlement, stake, unstake and
//!   withdrawal transitions, pure and collaborator-free
//! - **Collaborators**: `Clock`, `TokenVault` and `RewardMinter` seams the
//!   ledger is built against
//! - **Token Operations**: In-memory fungible token ledger with allowances
//! - **Access Control**: Admin/minter roles for reward issuance
//! - **Events**: Typed, serializable event log for indexing
//!
//! This crate is `no_std` compatible when built without the default
//! `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export collections for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
pub use std::{collections::BTreeMap, string::String, vec::Vec};

pub mod constants;
pub mod errors;
pub mod types;
pub mod math;
pub mod staking;
pub mod events;
pub mod clock;
pub mod interfaces;
pub mod token_ops;
pub mod access_control;

// Re-exports for convenience
pub use errors::*;
pub use types::*;
pub use math::*;
pub use staking::*;
pub use events::*;
pub use clock::*;
pub use interfaces::*;
pub use token_ops::*;
pub use access_control::*;
