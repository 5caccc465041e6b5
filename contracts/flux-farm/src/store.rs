//! Account Store
//!
//! Single-owner map of staking records plus the running principal total.
//! Mutations go through a two-step [`AccountStore::stage`] /
//! [`AccountStore::commit`] boundary: staging does every fallible
//! computation, committing cannot fail.
//!
//! [`LedgerSnapshot`] is the persisted form: borsh-encoded records sealed
//! with a SHA-256 digest.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use flux_common::{
    errors::{FluxError, FluxResult},
    math::{safe_add, safe_sub},
    staking::StakeAccount,
    types::{Address, Amount, Timestamp},
};

// ============ Store ============

/// A record ready to be written, with the principal total it implies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedCommit {
    address: Address,
    account: StakeAccount,
    total_staked: Amount,
}

impl StagedCommit {
    /// Record that will be written
    pub fn account(&self) -> &StakeAccount {
        &self.account
    }
}

/// Staking records keyed by account
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountStore {
    accounts: BTreeMap<Address, StakeAccount>,
    total_staked: Amount,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of `address`, all zero if never seen
    pub fn get(&self, address: &Address) -> StakeAccount {
        self.accounts.get(address).cloned().unwrap_or_default()
    }

    /// Whether `address` has ever been written
    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    /// Sum of principal across all records
    pub fn total_staked(&self) -> Amount {
        self.total_staked
    }

    /// Number of known accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True if no account has been written
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate records in address order
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &StakeAccount)> {
        self.accounts.iter()
    }

    /// Prepare a write of `account` under `address`
    pub fn stage(&self, address: Address, account: StakeAccount) -> FluxResult<StagedCommit> {
        let previous = self.accounts.get(&address).map_or(0, |a| a.principal);
        let total_staked = safe_add(safe_sub(self.total_staked, previous)?, account.principal)?;
        Ok(StagedCommit {
            address,
            account,
            total_staked,
        })
    }

    /// Apply a staged write
    pub fn commit(&mut self, staged: StagedCommit) {
        self.accounts.insert(staged.address, staged.account);
        self.total_staked = staged.total_staked;
    }

    /// Rebuild a store from records, checking each one
    pub fn from_records(records: Vec<(Address, StakeAccount)>) -> FluxResult<Self> {
        let mut store = Self::new();
        for (address, account) in records {
            if store.contains(&address) {
                return Err(FluxError::InvalidSnapshot { reason: "duplicate account" });
            }
            if !account.is_consistent() {
                return Err(FluxError::InvalidSnapshot { reason: "inconsistent account" });
            }
            let staged = store.stage(address, account)?;
            store.commit(staged);
        }
        Ok(store)
    }
}

// ============ Snapshot ============

/// Sealed copy of every staking record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct LedgerSnapshot {
    /// Clock reading when the snapshot was taken
    pub taken_at: Timestamp,
    /// Principal total at that time
    pub total_staked: Amount,
    /// Records in address order
    pub accounts: Vec<(Address, StakeAccount)>,
    /// SHA-256 over the fields above
    pub digest: [u8; 32],
}

impl LedgerSnapshot {
    /// Capture `store` at `taken_at`
    pub fn capture(store: &AccountStore, taken_at: Timestamp) -> Self {
        let accounts: Vec<(Address, StakeAccount)> =
            store.iter().map(|(a, s)| (*a, s.clone())).collect();
        let digest = compute_digest(taken_at, store.total_staked(), &accounts);
        Self {
            taken_at,
            total_staked: store.total_staked(),
            accounts,
            digest,
        }
    }

    /// Check the digest against the contents
    pub fn verify(&self) -> FluxResult<()> {
        let actual = compute_digest(self.taken_at, self.total_staked, &self.accounts);
        if actual != self.digest {
            return Err(FluxError::SnapshotCorrupted {
                expected: self.digest,
                actual,
            });
        }
        Ok(())
    }

    /// Verify and rebuild the store
    pub fn into_store(self) -> FluxResult<AccountStore> {
        self.verify()?;
        let store = AccountStore::from_records(self.accounts)?;
        if store.total_staked() != self.total_staked {
            return Err(FluxError::InvalidSnapshot { reason: "total mismatch" });
        }
        Ok(store)
    }

    /// Serialize to bytes for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> FluxResult<Self> {
        borsh::from_slice(bytes).map_err(|_| FluxError::InvalidSnapshot { reason: "undecodable" })
    }
}

fn compute_digest(taken_at: Timestamp, total_staked: Amount, accounts: &[(Address, StakeAccount)]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"flux-farm/snapshot");
    hasher.update(taken_at.to_le_bytes());
    hasher.update(total_staked.to_le_bytes());
    for (address, account) in accounts {
        hasher.update(address);
        hasher.update(borsh::to_vec(account).unwrap_or_default());
    }
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;
    use flux_common::staking::apply_stake;

    fn alice() -> Address {
        [1u8; 32]
    }

    fn bob() -> Address {
        [2u8; 32]
    }

    fn populated() -> AccountStore {
        let mut store = AccountStore::new();
        let a = apply_stake(&StakeAccount::new(), 10, 0).unwrap().account;
        let b = apply_stake(&StakeAccount::new(), 7, 50).unwrap().account;
        let staged = store.stage(alice(), a).unwrap();
        store.commit(staged);
        let staged = store.stage(bob(), b).unwrap();
        store.commit(staged);
        store
    }

    #[test]
    fn test_unknown_account_reads_zero() {
        let store = AccountStore::new();
        assert_eq!(store.get(&alice()), StakeAccount::new());
        assert!(!store.contains(&alice()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_stage_does_not_write() {
        let store = AccountStore::new();
        let account = apply_stake(&StakeAccount::new(), 10, 0).unwrap().account;

        let staged = store.stage(alice(), account.clone()).unwrap();

        assert_eq!(staged.account(), &account);
        assert_eq!(store.total_staked(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_commit_tracks_total() {
        let mut store = populated();
        assert_eq!(store.total_staked(), 17);

        let mut emptied = store.get(&alice());
        emptied.principal = 0;
        emptied.stake_start_time = None;
        let staged = store.stage(alice(), emptied).unwrap();
        store.commit(staged);

        assert_eq!(store.total_staked(), 7);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = populated();
        let snapshot = LedgerSnapshot::capture(&store, 1_000);

        let decoded = LedgerSnapshot::from_bytes(&snapshot.to_bytes()).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.into_store().unwrap(), store);
    }

    #[test]
    fn test_snapshot_tamper_detected() {
        let mut snapshot = LedgerSnapshot::capture(&populated(), 1_000);
        snapshot.accounts[0].1.pending_yield = 1_000_000;

        assert!(matches!(
            snapshot.into_store(),
            Err(FluxError::SnapshotCorrupted { .. })
        ));
    }

    #[test]
    fn test_snapshot_rejects_inconsistent_record() {
        let broken = StakeAccount {
            principal: 5,
            stake_start_time: None,
            pending_yield: 0,
            yield_carry: 0,
        };
        let accounts = vec![(alice(), broken)];
        let digest = compute_digest(0, 5, &accounts);
        let snapshot = LedgerSnapshot {
            taken_at: 0,
            total_staked: 5,
            accounts,
            digest,
        };

        assert_eq!(
            snapshot.into_store(),
            Err(FluxError::InvalidSnapshot { reason: "inconsistent account" })
        );
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert_eq!(
            LedgerSnapshot::from_bytes(&[1, 2, 3]),
            Err(FluxError::InvalidSnapshot { reason: "undecodable" })
        );
    }
}
