// SPDX-FileCopyrightText: 2026 Smajobb Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-window rate limiting.
//!
//! Counters are keyed by `(subject, window_index)` where
//! `window_index = floor(now / interval)`. On window rollover the old
//! counter simply stops being consulted; [`RateLimitStore::sweep`] removes
//! stale entries for stores without TTL support.
//!
//! The store is injected rather than global so a single-instance gateway
//! can use the in-process [`MemoryStore`] while a horizontally scaled
//! deployment swaps in a shared backend without touching the pipeline.

use std::sync::Arc;

use dashmap::DashMap;

/// Counter storage for rate-limit windows.
///
/// `incr` must be atomic with respect to concurrent callers for the same
/// key: two simultaneous sends from one user must observe distinct counts.
/// A spam storm against a youth-safety gateway is itself a risk vector, so
/// this is correctness, not optimization.
pub trait RateLimitStore: Send + Sync {
    /// Increment the counter for `(subject, window_index)` and return the
    /// count after the increment.
    fn incr(&self, subject: &str, window_index: i64) -> u32;

    /// Drop counters for windows older than `current_window`.
    fn sweep(&self, current_window: i64);
}

/// In-process counter store backed by a concurrent map. Entry-level
/// locking in the map makes `incr` an atomic increment-and-read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counters: DashMap<(String, i64), u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStore for MemoryStore {
    fn incr(&self, subject: &str, window_index: i64) -> u32 {
        let mut entry = self
            .counters
            .entry((subject.to_string(), window_index))
            .or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }

    fn sweep(&self, current_window: i64) {
        self.counters.retain(|(_, window), _| *window >= current_window);
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// Unix timestamp (seconds) when the current window ends.
    pub reset_at: i64,
}

/// Fixed-window limiter over an injected counter store.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        RateLimiter { store }
    }

    /// Check and consume one unit of quota for the subject.
    pub fn check(&self, subject: &str, limit: u32, interval_secs: i64) -> Decision {
        self.check_at(subject, limit, interval_secs, chrono::Utc::now().timestamp())
    }

    /// Deterministic variant used by tests and by callers with their own
    /// clock source.
    pub fn check_at(&self, subject: &str, limit: u32, interval_secs: i64, now: i64) -> Decision {
        let interval = interval_secs.max(1);
        let window_index = now.div_euclid(interval);
        let reset_at = (window_index + 1) * interval;

        let count = self.store.incr(subject, window_index);
        decide(count, limit, reset_at)
    }

    /// Drop counters from windows that have already ended. Stores without
    /// TTL support grow one entry per `(subject, window)` until swept, so
    /// the gateway runs this on a timer.
    pub fn sweep(&self, interval_secs: i64) {
        self.sweep_at(interval_secs, chrono::Utc::now().timestamp());
    }

    /// Deterministic variant of [`RateLimiter::sweep`].
    pub fn sweep_at(&self, interval_secs: i64, now: i64) {
        let interval = interval_secs.max(1);
        self.store.sweep(now.div_euclid(interval));
    }
}

fn decide(count: u32, limit: u32, reset_at: i64) -> Decision {
    if count > limit {
        Decision {
            allowed: false,
            limit,
            remaining: 0,
            reset_at,
        }
    } else {
        Decision {
            allowed: true,
            limit,
            remaining: limit - count,
            reset_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> RateLimiter {
        RateLimiter::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn allows_up_to_the_limit() {
        let limiter = limiter();
        for i in 0..5 {
            let d = limiter.check_at("user-1:message", 5, 3600, 1000);
            assert!(d.allowed, "request {i} should be allowed");
            assert_eq!(d.remaining, 4 - i);
        }
    }

    #[test]
    fn blocks_the_request_past_the_limit() {
        let limiter = limiter();
        for _ in 0..60 {
            assert!(limiter.check_at("user-1:message", 60, 3600, 1000).allowed);
        }
        let d = limiter.check_at("user-1:message", 60, 3600, 1000);
        assert!(!d.allowed);
        assert_eq!(d.remaining, 0);
        assert_eq!(d.limit, 60);
    }

    #[test]
    fn window_rollover_resets_the_counter() {
        let limiter = limiter();
        for _ in 0..3 {
            limiter.check_at("u", 3, 60, 30);
        }
        assert!(!limiter.check_at("u", 3, 60, 59).allowed);
        // 60 seconds later: a new window, a fresh counter.
        let d = limiter.check_at("u", 3, 60, 61);
        assert!(d.allowed);
        assert_eq!(d.remaining, 2);
    }

    #[test]
    fn reset_at_is_the_window_end() {
        let limiter = limiter();
        let d = limiter.check_at("u", 10, 3600, 7250);
        // Window [7200, 10800).
        assert_eq!(d.reset_at, 10800);
    }

    #[test]
    fn subjects_are_independent() {
        let limiter = limiter();
        limiter.check_at("a", 1, 60, 0);
        assert!(!limiter.check_at("a", 1, 60, 0).allowed);
        assert!(limiter.check_at("b", 1, 60, 0).allowed);
    }

    #[test]
    fn sweep_drops_expired_windows() {
        let store = Arc::new(MemoryStore::new());
        let limiter = RateLimiter::new(store.clone());
        limiter.check_at("u", 5, 60, 0); // window 0
        limiter.check_at("u", 5, 60, 65); // window 1
        limiter.sweep_at(60, 65);
        assert_eq!(store.counters.len(), 1);
        // The live window's counter survives the sweep.
        assert_eq!(limiter.check_at("u", 5, 60, 70).remaining, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_increments_never_exceed_the_limit() {
        let limiter = limiter();
        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = limiter.clone();
            handles.push(tokio::spawn(async move {
                let mut allowed = 0u32;
                for _ in 0..25 {
                    if limiter.check_at("shared", 100, 3600, 500).allowed {
                        allowed += 1;
                    }
                }
                allowed
            }));
        }
        let mut total_allowed = 0;
        for h in handles {
            total_allowed += h.await.unwrap();
        }
        // 200 attempts against a limit of 100: exactly 100 may pass.
        assert_eq!(total_allowed, 100);
    }
}
