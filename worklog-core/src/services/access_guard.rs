//! Per-address brute force lockout.
//!
//! The guard tracks consecutive authentication failures per calling address.
//! After any failure the address must sit out a cooldown before the next
//! attempt is even evaluated; once the failure count reaches the configured
//! threshold the address is blocked for the remaining life of the process,
//! no matter what credentials it supplies afterwards.
//!
//! The guard never touches credentials itself. Callers ask it whether an
//! address may attempt verification ([`AccessGuard::check_address`]), run the
//! (slow) hash verification outside the guard's lock, and then report the
//! outcome back ([`AccessGuard::record_failure`] /
//! [`AccessGuard::record_success`]).
//!
//! # Thread Safety
//!
//! All state lives behind a single mutex. The tracked set is bounded by the
//! number of distinct offending addresses, and no blocking work happens
//! inside the critical sections, so one coarse lock is sufficient.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::{Clock, error::AuthError};

/// Configuration for lockout behavior.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Time an address must wait after a failure before the next attempt is
    /// evaluated. Every non-banning failure re-arms this window.
    pub block_cooldown: Duration,

    /// Failure count at which an address becomes permanently blocked.
    pub max_failures_before_ban: u32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            block_cooldown: Duration::seconds(10),
            max_failures_before_ban: 10,
        }
    }
}

/// Failure state for one calling address.
///
/// A record exists only while the address has at least one failure since its
/// last success; at or above the ban threshold it is never removed.
#[derive(Debug, Clone)]
struct AccessRecord {
    failure_count: u32,
    last_failure_at: DateTime<Utc>,
}

/// Result of recording a failed attempt.
#[derive(Debug, Clone, Copy)]
pub struct FailureTally {
    /// Consecutive failures now on record for the address.
    pub failure_count: u32,

    /// True exactly when this failure was the one that crossed the ban
    /// threshold. Callers use this to fire the block alert once.
    pub newly_blocked: bool,

    /// When the failure was recorded.
    pub at: DateTime<Utc>,
}

/// Stateful gatekeeper consulted on every authentication attempt.
pub struct AccessGuard {
    config: GuardConfig,
    clock: Arc<dyn Clock>,
    records: Mutex<HashMap<String, AccessRecord>>,
}

impl AccessGuard {
    pub fn new(config: GuardConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Decide whether an address may proceed to credential verification.
    ///
    /// The ban check runs before the cooldown check: an address at or over
    /// the threshold gets `PermanentlyBlocked` even if its cooldown window
    /// has long expired. Neither rejection mutates the record, so a
    /// cooling-down attempt does not count as a new failure.
    pub fn check_address(&self, address: &str) -> Result<(), AuthError> {
        let records = self.lock_records();

        if let Some(record) = records.get(address) {
            if record.failure_count >= self.config.max_failures_before_ban {
                return Err(AuthError::PermanentlyBlocked);
            }
            if self.clock.now() - record.last_failure_at < self.config.block_cooldown {
                return Err(AuthError::CoolingDown);
            }
        }

        Ok(())
    }

    /// Record a failed verification for an address.
    ///
    /// Creates the record on the first failure, otherwise increments the
    /// count and refreshes the failure timestamp. The increment happens
    /// under the lock, so two racing failures for the same address produce
    /// two distinct counts and the threshold transition fires exactly once.
    pub fn record_failure(&self, address: &str) -> FailureTally {
        let now = self.clock.now();
        let mut records = self.lock_records();

        let record = records
            .entry(address.to_string())
            .or_insert(AccessRecord {
                failure_count: 0,
                last_failure_at: now,
            });
        record.failure_count += 1;
        record.last_failure_at = now;

        FailureTally {
            failure_count: record.failure_count,
            newly_blocked: record.failure_count == self.config.max_failures_before_ban,
            at: now,
        }
    }

    /// Clear an address's failure record after a successful verification.
    ///
    /// A record at or over the ban threshold is left untouched: if a racing
    /// failure pushed the address over the line while this caller was
    /// verifying, the ban wins.
    pub fn record_success(&self, address: &str) {
        let mut records = self.lock_records();

        if let Some(record) = records.get(address) {
            if record.failure_count >= self.config.max_failures_before_ban {
                return;
            }
        }
        records.remove(address);
    }

    /// Consecutive failures currently on record for an address, if any.
    pub fn failure_count(&self, address: &str) -> Option<u32> {
        self.lock_records().get(address).map(|r| r.failure_count)
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<String, AccessRecord>> {
        // A panic while holding the lock leaves only per-address counters
        // behind; the map is still structurally sound, so recover it.
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::test_support::ManualClock;
    use chrono::TimeZone;

    fn test_clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        ))
    }

    fn guard_with(cooldown_secs: i64, max_failures: u32, clock: Arc<ManualClock>) -> AccessGuard {
        AccessGuard::new(
            GuardConfig {
                block_cooldown: Duration::seconds(cooldown_secs),
                max_failures_before_ban: max_failures,
            },
            clock,
        )
    }

    #[test]
    fn test_unknown_address_is_allowed() {
        let guard = guard_with(10, 10, test_clock());
        assert!(guard.check_address("10.0.0.1").is_ok());
        assert_eq!(guard.failure_count("10.0.0.1"), None);
    }

    #[test]
    fn test_first_failure_creates_record_with_count_one() {
        let guard = guard_with(10, 10, test_clock());

        let tally = guard.record_failure("10.0.0.1");
        assert_eq!(tally.failure_count, 1);
        assert!(!tally.newly_blocked);
        assert_eq!(guard.failure_count("10.0.0.1"), Some(1));
    }

    #[test]
    fn test_first_failure_is_never_cooling_down_beforehand() {
        let guard = guard_with(10, 10, test_clock());
        // No record yet, so no cooldown can apply regardless of timing.
        assert!(guard.check_address("198.51.100.7").is_ok());
    }

    #[test]
    fn test_cooldown_applies_after_failure() {
        let clock = test_clock();
        let guard = guard_with(10, 10, clock.clone());

        guard.record_failure("10.0.0.1");

        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::CoolingDown)
        ));

        // 9 seconds in, still cooling
        clock.advance(Duration::seconds(9));
        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::CoolingDown)
        ));

        // At exactly the cooldown boundary the window has elapsed
        clock.advance(Duration::seconds(1));
        assert!(guard.check_address("10.0.0.1").is_ok());
    }

    #[test]
    fn test_cooldown_rejection_does_not_mutate_record() {
        let clock = test_clock();
        let guard = guard_with(10, 10, clock.clone());

        guard.record_failure("10.0.0.1");
        let before = guard.failure_count("10.0.0.1");

        for _ in 0..5 {
            let _ = guard.check_address("10.0.0.1");
        }

        assert_eq!(guard.failure_count("10.0.0.1"), before);

        // The window is measured from the original failure, not from the
        // rejected probes.
        clock.advance(Duration::seconds(10));
        assert!(guard.check_address("10.0.0.1").is_ok());
    }

    #[test]
    fn test_each_failure_rearms_cooldown() {
        let clock = test_clock();
        let guard = guard_with(10, 10, clock.clone());

        guard.record_failure("10.0.0.1");
        clock.advance(Duration::seconds(10));
        assert!(guard.check_address("10.0.0.1").is_ok());

        guard.record_failure("10.0.0.1");
        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::CoolingDown)
        ));
    }

    #[test]
    fn test_ban_at_exact_threshold() {
        let clock = test_clock();
        let guard = guard_with(10, 3, clock.clone());

        for expected in 1..=2u32 {
            let tally = guard.record_failure("10.0.0.1");
            assert_eq!(tally.failure_count, expected);
            assert!(!tally.newly_blocked);
            clock.advance(Duration::seconds(10));
        }

        // The Nth failure flips the record to permanent
        let tally = guard.record_failure("10.0.0.1");
        assert_eq!(tally.failure_count, 3);
        assert!(tally.newly_blocked);

        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::PermanentlyBlocked)
        ));
    }

    #[test]
    fn test_ban_signal_fires_exactly_once() {
        let clock = test_clock();
        let guard = guard_with(0, 3, clock.clone());

        let transitions: Vec<bool> = (0..5)
            .map(|_| guard.record_failure("10.0.0.1").newly_blocked)
            .collect();

        assert_eq!(transitions, vec![false, false, true, false, false]);
    }

    #[test]
    fn test_ban_check_runs_before_cooldown_check() {
        let clock = test_clock();
        let guard = guard_with(10, 2, clock.clone());

        guard.record_failure("10.0.0.1");
        guard.record_failure("10.0.0.1");

        // Within the cooldown window the ban still takes precedence
        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::PermanentlyBlocked)
        ));

        // And long after the window has expired it persists
        clock.advance(Duration::days(365));
        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::PermanentlyBlocked)
        ));
    }

    #[test]
    fn test_success_removes_record() {
        let clock = test_clock();
        let guard = guard_with(10, 10, clock.clone());

        guard.record_failure("10.0.0.1");
        guard.record_success("10.0.0.1");

        assert_eq!(guard.failure_count("10.0.0.1"), None);

        // Next failure starts a fresh count
        let tally = guard.record_failure("10.0.0.1");
        assert_eq!(tally.failure_count, 1);
    }

    #[test]
    fn test_success_with_no_record_is_noop() {
        let guard = guard_with(10, 10, test_clock());
        guard.record_success("10.0.0.1");
        assert_eq!(guard.failure_count("10.0.0.1"), None);
    }

    #[test]
    fn test_success_never_removes_banned_record() {
        let clock = test_clock();
        let guard = guard_with(0, 3, clock.clone());

        for _ in 0..3 {
            guard.record_failure("10.0.0.1");
        }

        guard.record_success("10.0.0.1");

        assert_eq!(guard.failure_count("10.0.0.1"), Some(3));
        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::PermanentlyBlocked)
        ));
    }

    #[test]
    fn test_addresses_tracked_independently() {
        let clock = test_clock();
        let guard = guard_with(10, 2, clock.clone());

        guard.record_failure("10.0.0.1");
        guard.record_failure("10.0.0.1");

        assert!(matches!(
            guard.check_address("10.0.0.1"),
            Err(AuthError::PermanentlyBlocked)
        ));
        assert!(guard.check_address("10.0.0.2").is_ok());
    }

    #[test]
    fn test_nine_failures_then_success_scenario() {
        // Address A: 9 spaced failures, then success after the cooldown.
        let clock = test_clock();
        let guard = guard_with(10, 10, clock.clone());

        for expected in 1..=9u32 {
            let tally = guard.record_failure("addr-a");
            assert_eq!(tally.failure_count, expected);
            assert!(!tally.newly_blocked);
            clock.advance(Duration::seconds(11));
        }

        assert!(guard.check_address("addr-a").is_ok());
        guard.record_success("addr-a");
        assert_eq!(guard.failure_count("addr-a"), None);
    }

    #[test]
    fn test_ten_failures_ban_scenario() {
        // Address B: 10 spaced failures, then permanently blocked.
        let clock = test_clock();
        let guard = guard_with(10, 10, clock.clone());

        let mut signals = 0;
        for _ in 0..10 {
            if guard.record_failure("addr-b").newly_blocked {
                signals += 1;
            }
            clock.advance(Duration::seconds(11));
        }
        assert_eq!(signals, 1);

        assert!(matches!(
            guard.check_address("addr-b"),
            Err(AuthError::PermanentlyBlocked)
        ));
    }

    #[test]
    fn test_concurrent_failures_count_distinctly() {
        use std::thread;

        let guard = Arc::new(guard_with(0, 64, test_clock()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let guard = Arc::clone(&guard);
                thread::spawn(move || {
                    for _ in 0..8 {
                        guard.record_failure("10.0.0.1");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(guard.failure_count("10.0.0.1"), Some(64));
    }
}
