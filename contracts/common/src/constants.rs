//! Protocol Constants
//!
//! All magic numbers and configuration defaults for Flux Farm.
//! Token amounts use 18 decimals, matching the ERC-20 style tokens the
//! farm was designed around.

/// Farm metadata
pub mod farm {
    /// Display name of the staking farm
    pub const NAME: &str = "Flux Farm";
}

/// Reward token metadata
pub mod reward_token {
    /// Token name
    pub const NAME: &str = "FluxToken";
    /// Token symbol
    pub const SYMBOL: &str = "FLUX";
    /// Decimal places
    pub const DECIMALS: u8 = 18;
    /// One whole token in base units (1e18)
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Default principal token metadata (the mock stablecoin used in tests)
pub mod principal_token {
    /// Token name
    pub const NAME: &str = "MockDAI";
    /// Token symbol
    pub const SYMBOL: &str = "mDAI";
    /// Decimal places
    pub const DECIMALS: u8 = 18;
    /// One whole token in base units (1e18)
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Time-related constants
pub mod time {
    /// Seconds in one accrual period. Staking `P` for this long yields `P`.
    pub const SECONDS_PER_DAY: u64 = 86_400;

    /// Seconds per hour
    pub const SECONDS_PER_HOUR: u64 = 3_600;
}

/// Supply limits
pub mod supply {
    /// Hard cap on any token's total supply (1e36 base units)
    pub const MAX_SUPPLY: u128 = 1_000_000_000_000_000_000_000_000_000_000_000_000;
}
