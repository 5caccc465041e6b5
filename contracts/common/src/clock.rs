//! Time Sources
//!
//! The ledger reads time exactly once per operation through [`Clock`].
//! Readings must be monotonic non-decreasing; equal consecutive readings are
//! allowed.

use core::sync::atomic::{AtomicU64, Ordering};

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use crate::constants::time::SECONDS_PER_DAY;
use crate::types::Timestamp;

/// Source of the current time in seconds
pub trait Clock {
    /// Current timestamp
    fn now(&self) -> Timestamp;
}

/// Wall-clock time in seconds since the Unix epoch
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock.
///
/// Clones share the same reading, so a test can keep a handle while the
/// ledger owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `start`
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    /// Move time forward by `seconds`
    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Move time forward by whole days
    pub fn advance_days(&self, days: u64) {
        self.advance(days.saturating_mul(SECONDS_PER_DAY));
    }

    /// Set the reading; ignored if it would move time backwards
    pub fn set(&self, timestamp: Timestamp) {
        self.now.fetch_max(timestamp, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared() {
        let clock = ManualClock::new(100);
        let handle = clock.clone();

        handle.advance(50);
        assert_eq!(clock.now(), 150);

        handle.advance_days(1);
        assert_eq!(clock.now(), 150 + SECONDS_PER_DAY);
    }

    #[test]
    fn test_manual_clock_monotonic() {
        let clock = ManualClock::new(1_000);
        clock.set(500);
        assert_eq!(clock.now(), 1_000);
        clock.set(2_000);
        assert_eq!(clock.now(), 2_000);
    }

    #[test]
    fn test_system_clock_past_epoch() {
        assert!(SystemClock.now() > 0);
    }
}
