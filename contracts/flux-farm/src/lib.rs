//! Flux Farm Contract
//!
//! Staking ledger paying linear, time-weighted yield. Holders stake the
//! principal token, accrue FLUX at one unit per staked unit per day, and may
//! unstake or withdraw the banked reward at any time.
//!
//! ## Transaction Boundary
//!
//! Every mutating operation follows the same shape:
//!
//! 1. Read the clock once
//! 2. Stage the new account record (settle, then apply the delta)
//! 3. Stage the store write, which does all remaining fallible math
//! 4. Call the collaborator (custody or minting)
//! 5. Commit and emit an event only if the call succeeded
//!
//! A failure at any step leaves the ledger exactly as it was.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

pub mod adapters;
pub mod store;


pub use adapters::{EscrowVault, FluxMinter};
pub use store::{AccountStore, LedgerSnapshot, StagedCommit};

use flux_common::{
    access_control::Role,
    clock::Clock,
    constants::farm,
    errors::{FluxError, FluxResult},
    events::{EventLog, FluxEvent},
    interfaces::{RewardMinter, TokenVault},
    staking::{apply_stake, apply_unstake, apply_withdraw_yield, validate_stake, StakeAccount},
    types::{derive_address, Address, Amount, FarmAction, ZERO_ADDRESS},
};
use flux_token::{Erc20, FluxToken};

// ============ Farm Config ============

/// Configuration for a Flux Farm deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct FarmConfig {
    /// Display name
    pub name: String,
    /// Address holding staked principal
    pub escrow: Address,
}

impl FarmConfig {
    /// Config with the default name
    pub fn new(escrow: Address) -> Self {
        Self {
            name: farm::NAME.to_string(),
            escrow,
        }
    }
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self::new(derive_address("escrow"))
    }
}

/// Result of a dispatched [`FarmAction`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum FarmOutcome {
    /// Principal deposited
    Staked { principal: Amount, yield_banked: Amount },
    /// Principal returned
    Unstaked { principal: Amount, yield_banked: Amount },
    /// Banked reward minted
    YieldWithdrawn { minted: Amount },
}

// ============ Stake Ledger ============

/// The farm: staking records plus the collaborators that move tokens
#[derive(Debug)]
pub struct StakeLedger<C: Clock, V: TokenVault, M: RewardMinter> {
    config: FarmConfig,
    clock: C,
    vault: V,
    minter: M,
    store: AccountStore,
    events: EventLog,
}

/// Farm wired to the concrete token contracts
pub type FluxFarm<C> = StakeLedger<C, EscrowVault, FluxMinter>;

impl<C: Clock> StakeLedger<C, EscrowVault, FluxMinter> {
    /// Deploy both tokens and the farm, granting the minter role to the escrow
    pub fn deploy(admin: Address, config: FarmConfig, clock: C) -> FluxResult<Self> {
        let mut reward = FluxToken::new(admin);
        reward.grant_role(admin, config.escrow, Role::Minter)?;

        let vault = EscrowVault::new(Erc20::mock_dai(), config.escrow);
        let minter = FluxMinter::new(reward, config.escrow);
        Ok(Self::new(config, clock, vault, minter))
    }
}

impl<C: Clock, V: TokenVault, M: RewardMinter> StakeLedger<C, V, M> {
    /// Create an empty ledger
    pub fn new(config: FarmConfig, clock: C, vault: V, minter: M) -> Self {
        Self {
            config,
            clock,
            vault,
            minter,
            store: AccountStore::new(),
            events: EventLog::new(),
        }
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// Fails if the snapshot was tampered with, holds an inconsistent record,
    /// or does not match what `vault` holds in custody.
    pub fn restore(
        config: FarmConfig,
        clock: C,
        vault: V,
        minter: M,
        snapshot: LedgerSnapshot,
    ) -> FluxResult<Self> {
        let store = snapshot.into_store()?;
        let ledger = Self {
            config,
            clock,
            vault,
            minter,
            store,
            events: EventLog::new(),
        };
        ledger.verify_conservation()?;
        Ok(ledger)
    }

    // ============ Mutating Operations ============

    /// Deposit `amount` of principal for `account`
    pub fn stake(&mut self, account: Address, amount: Amount) -> FluxResult<()> {
        self.process_stake(account, amount).map(|_| ())
    }

    /// Return `amount` of principal to `account`
    pub fn unstake(&mut self, account: Address, amount: Amount) -> FluxResult<()> {
        self.process_unstake(account, amount).map(|_| ())
    }

    /// Mint all banked reward to `account`, returning the amount minted
    pub fn withdraw_yield(&mut self, account: Address) -> FluxResult<Amount> {
        self.process_withdraw_yield(account)
    }

    /// Main entry point dispatching a [`FarmAction`] issued by `account`
    pub fn execute(&mut self, account: Address, action: &FarmAction) -> FluxResult<FarmOutcome> {
        match action {
            FarmAction::Stake { amount } => self.process_stake(account, *amount),
            FarmAction::Unstake { amount } => self.process_unstake(account, *amount),
            FarmAction::WithdrawYield => self
                .process_withdraw_yield(account)
                .map(|minted| FarmOutcome::YieldWithdrawn { minted }),
        }
    }

    fn process_stake(&mut self, account: Address, amount: Amount) -> FluxResult<FarmOutcome> {
        // 1. Validate before touching anything
        validate_stake(amount)?;
        let available = self.vault.available(&account);
        if available < amount {
            return Err(FluxError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        // 2. Stage
        let now = self.clock.now();
        let transition = apply_stake(&self.store.get(&account), amount, now)?;
        let staged = self.store.stage(account, transition.account)?;

        // 3. Custody
        let escrow = self.config.escrow;
        self.vault
            .transfer_in(&account, amount)
            .map_err(|_| FluxError::TransferFailed {
                from: account,
                to: escrow,
                amount,
            })?;

        // 4. Commit
        let principal = staged.account().principal;
        self.store.commit(staged);
        self.events.emit(FluxEvent::Staked {
            account,
            amount,
            new_principal: principal,
            yield_banked: transition.yield_banked,
            timestamp: now,
        });

        Ok(FarmOutcome::Staked {
            principal,
            yield_banked: transition.yield_banked,
        })
    }

    fn process_unstake(&mut self, account: Address, amount: Amount) -> FluxResult<FarmOutcome> {
        let now = self.clock.now();
        let transition = apply_unstake(&self.store.get(&account), amount, now)?;
        let staged = self.store.stage(account, transition.account)?;

        let escrow = self.config.escrow;
        self.vault
            .transfer_out(&account, amount)
            .map_err(|_| FluxError::TransferFailed {
                from: escrow,
                to: account,
                amount,
            })?;

        let principal = staged.account().principal;
        self.store.commit(staged);
        self.events.emit(FluxEvent::Unstaked {
            account,
            amount,
            new_principal: principal,
            yield_banked: transition.yield_banked,
            timestamp: now,
        });

        Ok(FarmOutcome::Unstaked {
            principal,
            yield_banked: transition.yield_banked,
        })
    }

    fn process_withdraw_yield(&mut self, account: Address) -> FluxResult<Amount> {
        let now = self.clock.now();
        let transition = apply_withdraw_yield(&self.store.get(&account), now)?;
        let staged = self.store.stage(account, transition.account)?;

        let minted = transition.to_mint;
        if minted > 0 {
            self.minter
                .mint(&account, minted)
                .map_err(|_| FluxError::TransferFailed {
                    from: ZERO_ADDRESS,
                    to: account,
                    amount: minted,
                })?;
        }

        self.store.commit(staged);
        self.events.emit(FluxEvent::YieldWithdrawn {
            account,
            amount: minted,
            timestamp: now,
        });

        Ok(minted)
    }

    // ============ Queries ============

    /// Principal currently staked by `account`
    pub fn staking_balance(&self, account: &Address) -> Amount {
        self.store.get(account).principal
    }

    /// Whether `account` has principal staked
    pub fn is_staking(&self, account: &Address) -> bool {
        self.store.get(account).is_staking()
    }

    /// Seconds since the start of the current accrual window, 0 when idle
    pub fn calculate_staking_time_in_seconds(&self, account: &Address) -> u64 {
        self.store.get(account).staking_time(self.clock.now())
    }

    /// Reward banked but not yet minted
    pub fn flux_token_balance(&self, account: &Address) -> Amount {
        self.store.get(account).pending_yield
    }

    /// Banked reward plus what has accrued since, without settling
    pub fn preview_yield(&self, account: &Address) -> FluxResult<Amount> {
        self.store.get(account).preview_yield(self.clock.now())
    }

    /// Full record of `account`
    pub fn account(&self, account: &Address) -> StakeAccount {
        self.store.get(account)
    }

    /// Every known record in address order
    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &StakeAccount)> {
        self.store.iter()
    }

    /// Sum of principal across all accounts
    pub fn total_staked(&self) -> Amount {
        self.store.total_staked()
    }

    /// Check that custody holds exactly the staked principal
    pub fn verify_conservation(&self) -> FluxResult<()> {
        let ledger = self.store.total_staked();
        let custody = self.vault.custody_balance();
        if ledger != custody {
            return Err(FluxError::ConservationViolated { ledger, custody });
        }
        Ok(())
    }

    /// Seal the current records
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::capture(&self.store, self.clock.now())
    }

    // ============ Accessors ============

    /// Farm name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Farm configuration
    pub fn config(&self) -> &FarmConfig {
        &self.config
    }

    /// Time source
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Principal custody
    pub fn vault(&self) -> &V {
        &self.vault
    }

    /// Principal custody, for funding and approvals outside the ledger
    pub fn vault_mut(&mut self) -> &mut V {
        &mut self.vault
    }

    /// Reward issuance
    pub fn minter(&self) -> &M {
        &self.minter
    }

    /// Reward issuance, for role management outside the ledger
    pub fn minter_mut(&mut self) -> &mut M {
        &mut self.minter
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

#[cfg(test)]
mod tests {
    use super::*;
    use flux_common::clock::ManualClock;
    use flux_common::events::EventType;

    const ADMIN: Address = [7u8; 32];
    const ALICE: Address = [1u8; 32];

    fn funded_farm() -> FluxFarm<ManualClock> {
        let mut farm = FluxFarm::deploy(ADMIN, FarmConfig::default(), ManualClock::new(0)).unwrap();
        let escrow = farm.config().escrow;
        let token = farm.vault_mut().token_mut();
        token.mint(&ALICE, 100).unwrap();
        token.approve(&ALICE, &escrow, 100);
        farm
    }

    #[test]
    fn test_default_config() {
        let config = FarmConfig::default();
        assert_eq!(config.name, "Flux Farm");
        assert_eq!(config.escrow, derive_address("escrow"));
    }

    #[test]
    fn test_deploy_grants_minter_to_escrow() {
        let farm = funded_farm();
        assert_eq!(farm.name(), "Flux Farm");
        assert!(farm
            .minter()
            .token()
            .has_role(&farm.config().escrow, Role::Minter));
        assert!(!farm.minter().token().has_role(&ADMIN, Role::Minter));
    }

    #[test]
    fn test_stake_moves_custody_and_emits() {
        let mut farm = funded_farm();
        farm.stake(ALICE, 10).unwrap();

        assert_eq!(farm.staking_balance(&ALICE), 10);
        assert!(farm.is_staking(&ALICE));
        assert_eq!(farm.vault().available(&ALICE), 90);
        assert_eq!(farm.total_staked(), 10);
        farm.verify_conservation().unwrap();
        assert_eq!(farm.events().filter_by_type(EventType::Staked).len(), 1);
    }

    #[test]
    fn test_execute_reports_outcome() {
        let mut farm = funded_farm();
        let outcome = farm.execute(ALICE, &FarmAction::Stake { amount: 10 }).unwrap();
        assert_eq!(outcome, FarmOutcome::Staked { principal: 10, yield_banked: 0 });

        farm.clock().advance_days(1);
        let outcome = farm.execute(ALICE, &FarmAction::Unstake { amount: 4 }).unwrap();
        assert_eq!(outcome, FarmOutcome::Unstaked { principal: 6, yield_banked: 10 });

        let outcome = farm.execute(ALICE, &FarmAction::WithdrawYield).unwrap();
        assert_eq!(outcome, FarmOutcome::YieldWithdrawn { minted: 10 });
    }

    #[test]
    fn test_queries_on_unknown_account() {
        let farm = funded_farm();
        let stranger = [42u8; 32];
        assert_eq!(farm.staking_balance(&stranger), 0);
        assert!(!farm.is_staking(&stranger));
        assert_eq!(farm.calculate_staking_time_in_seconds(&stranger), 0);
        assert_eq!(farm.flux_token_balance(&stranger), 0);
        assert_eq!(farm.preview_yield(&stranger).unwrap(), 0);
        assert_eq!(farm.accounts().count(), 0);
    }

    #[test]
    fn test_failed_operation_emits_nothing() {
        let mut farm = funded_farm();
        assert!(farm.stake(ALICE, 0).is_err());
        assert!(farm.unstake(ALICE, 1).is_err());
        assert!(farm.events().is_empty());
    }
}
