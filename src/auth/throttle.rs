//! Login attempt throttle
//!
//! Process-wide, per-identifier tracking of failed login attempts. The
//! state is transient: nothing is persisted, and a restart forgets all
//! counters.
//!
//! # State machine (per identifier)
//!
//! ```text
//! Clean ──failure──▶ Counting (1..max-1 failures)
//! Counting ──failure──▶ ... ──failure reaches max──▶ Locked
//! Locked ──window elapses──▶ Clean
//! any state ──successful login──▶ Clean
//! ```
//!
//! Lockout is evaluated at the START of a login attempt from prior state:
//! the failure that pushes the counter to the limit still reports as an
//! ordinary mismatch, and the NEXT attempt observes the lockout.
//!
//! # Concurrency
//!
//! Entries live in a [`DashMap`] keyed by identifier, so different
//! identifiers never contend. Two truly simultaneous failures for the
//! same identifier may lose one increment; the throttle is a
//! defense-in-depth mechanism, not a hard security boundary, and
//! tolerates an approximately-correct counter.

use dashmap::DashMap;
use std::time::SystemTime;

/// Throttle tuning knobs
#[derive(Debug, Clone, Copy)]
pub struct ThrottleConfig {
    /// Failures within the window before lockout engages
    pub max_attempts: u32,
    /// Lockout window length, in whole minutes
    pub lockout_minutes: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        ThrottleConfig {
            max_attempts: 5,
            lockout_minutes: 30,
        }
    }
}

/// Transient per-identifier failure record
#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    attempts: u32,
    last_attempt: SystemTime,
}

/// Result of the pre-flight lockout check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleStatus {
    /// Attempt may proceed to credential comparison
    Clear,
    /// Identifier is locked; no comparison should run
    Locked {
        /// Recorded failures for the identifier
        attempts: u32,
        /// Whole minutes until the window elapses
        minutes_remaining: u64,
    },
}

/// Per-identifier login attempt limiter
#[derive(Debug, Default)]
pub struct LoginThrottle {
    config: ThrottleConfig,
    records: DashMap<String, AttemptRecord>,
}

impl LoginThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        LoginThrottle {
            config,
            records: DashMap::new(),
        }
    }

    /// Evaluate the lockout state of an identifier before a login attempt
    ///
    /// Returns [`ThrottleStatus::Locked`] when the identifier has reached
    /// the failure limit within the window. When the window has elapsed
    /// the record is evicted (back to Clean) and the attempt proceeds.
    /// Time is measured at whole-minute granularity.
    pub fn preflight(&self, identifier: &str) -> ThrottleStatus {
        let Some(record) = self.records.get(identifier).map(|r| *r) else {
            return ThrottleStatus::Clear;
        };

        let elapsed_minutes = SystemTime::now()
            .duration_since(record.last_attempt)
            .unwrap_or_default()
            .as_secs()
            / 60;

        if record.attempts >= self.config.max_attempts
            && elapsed_minutes < self.config.lockout_minutes
        {
            return ThrottleStatus::Locked {
                attempts: record.attempts,
                minutes_remaining: self.config.lockout_minutes - elapsed_minutes,
            };
        }

        if elapsed_minutes >= self.config.lockout_minutes {
            self.records.remove(identifier);
        }

        ThrottleStatus::Clear
    }

    /// Record a failed attempt, creating the record on first failure
    ///
    /// Returns the new counter value. A return equal to `max_attempts`
    /// means this failure just crossed the threshold and the next attempt
    /// will be rejected outright.
    pub fn record_failure(&self, identifier: &str) -> u32 {
        let now = SystemTime::now();
        let mut record = self
            .records
            .entry(identifier.to_string())
            .or_insert(AttemptRecord {
                attempts: 0,
                last_attempt: now,
            });
        record.attempts += 1;
        record.last_attempt = now;
        record.attempts
    }

    /// Drop the record for an identifier (successful login)
    pub fn clear(&self, identifier: &str) {
        self.records.remove(identifier);
    }

    /// Current failure count for an identifier, 0 when clean
    pub fn attempts(&self, identifier: &str) -> u32 {
        self.records
            .get(identifier)
            .map(|record| record.attempts)
            .unwrap_or(0)
    }

    /// Threshold at which lockout engages
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    /// Shift an identifier's last attempt into the past (test hook)
    #[cfg(test)]
    pub fn backdate(&self, identifier: &str, minutes: u64) {
        if let Some(mut record) = self.records.get_mut(identifier) {
            record.last_attempt -= std::time::Duration::from_secs(minutes * 60);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> LoginThrottle {
        LoginThrottle::new(ThrottleConfig::default())
    }

    #[test]
    fn test_clean_identifier_is_clear() {
        let throttle = throttle();
        assert_eq!(throttle.preflight("carol@x.com"), ThrottleStatus::Clear);
        assert_eq!(throttle.attempts("carol@x.com"), 0);
    }

    #[test]
    fn test_counting_below_limit_stays_clear() {
        let throttle = throttle();
        for expected in 1u32..=4 {
            assert_eq!(throttle.record_failure("carol@x.com"), expected);
            assert_eq!(throttle.preflight("carol@x.com"), ThrottleStatus::Clear);
        }
    }

    #[test]
    fn test_fifth_failure_locks_the_next_attempt() {
        let throttle = throttle();
        for _ in 0..5 {
            // Each failure is recorded normally; the limit-crossing one
            // included
            assert_eq!(throttle.preflight("carol@x.com"), ThrottleStatus::Clear);
            throttle.record_failure("carol@x.com");
        }

        assert_eq!(
            throttle.preflight("carol@x.com"),
            ThrottleStatus::Locked {
                attempts: 5,
                minutes_remaining: 30,
            }
        );
    }

    #[test]
    fn test_minutes_remaining_counts_down() {
        let throttle = throttle();
        for _ in 0..5 {
            throttle.record_failure("carol@x.com");
        }
        throttle.backdate("carol@x.com", 12);

        assert_eq!(
            throttle.preflight("carol@x.com"),
            ThrottleStatus::Locked {
                attempts: 5,
                minutes_remaining: 18,
            }
        );
    }

    #[test]
    fn test_window_elapse_returns_to_clean() {
        let throttle = throttle();
        for _ in 0..5 {
            throttle.record_failure("carol@x.com");
        }
        throttle.backdate("carol@x.com", 30);

        assert_eq!(throttle.preflight("carol@x.com"), ThrottleStatus::Clear);
        // The stale record was evicted, not just ignored
        assert_eq!(throttle.attempts("carol@x.com"), 0);
    }

    #[test]
    fn test_stale_counting_record_also_evicted() {
        let throttle = throttle();
        throttle.record_failure("carol@x.com");
        throttle.record_failure("carol@x.com");
        throttle.backdate("carol@x.com", 45);

        assert_eq!(throttle.preflight("carol@x.com"), ThrottleStatus::Clear);
        assert_eq!(throttle.attempts("carol@x.com"), 0);
    }

    #[test]
    fn test_clear_resets_identifier() {
        let throttle = throttle();
        for _ in 0..5 {
            throttle.record_failure("carol@x.com");
        }
        throttle.clear("carol@x.com");

        assert_eq!(throttle.preflight("carol@x.com"), ThrottleStatus::Clear);
        assert_eq!(throttle.attempts("carol@x.com"), 0);
    }

    #[test]
    fn test_identifiers_are_independent() {
        let throttle = throttle();
        for _ in 0..5 {
            throttle.record_failure("carol@x.com");
        }

        assert!(matches!(
            throttle.preflight("carol@x.com"),
            ThrottleStatus::Locked { .. }
        ));
        assert_eq!(throttle.preflight("dave@x.com"), ThrottleStatus::Clear);
    }

    #[test]
    fn test_concurrent_failures_for_distinct_identifiers() {
        use std::sync::Arc;
        use std::thread;

        let throttle = Arc::new(throttle());
        let mut handles = vec![];

        for i in 0..8 {
            let throttle = Arc::clone(&throttle);
            handles.push(thread::spawn(move || {
                let identifier = format!("user{}@x.com", i);
                for _ in 0..3 {
                    throttle.record_failure(&identifier);
                }
                assert_eq!(throttle.attempts(&identifier), 3);
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
