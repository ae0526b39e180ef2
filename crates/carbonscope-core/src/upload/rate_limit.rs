use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed-window limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    /// Expired entries are swept once the table grows past this size.
    pub sweep_threshold: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            max_requests: 10,
            sweep_threshold: 1000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the current window closes.
    pub reset_in: Duration,
}

impl RateLimitDecision {
    /// Seconds until reset, rounded up.
    pub fn reset_in_secs(&self) -> u64 {
        let secs = self.reset_in.as_secs();
        if self.reset_in.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Per-client request counter. Check and increment happen under one lock.
#[derive(Debug, Default)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Record one request from `client` and decide whether it may proceed.
    pub fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Instant::now())
    }

    /// Same as [`check`](Self::check) with an explicit clock.
    pub fn check_at(&self, client: &str, now: Instant) -> RateLimitDecision {
        let mut entries = self.entries.lock();

        if entries.len() > self.config.sweep_threshold {
            let before = entries.len();
            entries.retain(|_, e| now <= e.reset_at);
            debug!(removed = before - entries.len(), "swept expired rate-limit entries");
        }

        let window = WindowEntry {
            count: 0,
            reset_at: now + self.config.window,
        };
        let entry = entries.entry(client.to_string()).or_insert(window);
        if now > entry.reset_at {
            *entry = window;
        }

        let reset_in = entry.reset_at.saturating_duration_since(now);
        if entry.count >= self.config.max_requests {
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_in,
            };
        }

        entry.count += 1;
        RateLimitDecision {
            allowed: true,
            remaining: self.config.max_requests - entry.count,
            reset_in,
        }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::default();
        let now = Instant::now();
        for i in 0..10 {
            let d = limiter.check_at("1.2.3.4", now);
            assert!(d.allowed);
            assert_eq!(d.remaining, 9 - i);
        }
        let denied = limiter.check_at("1.2.3.4", now);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_in_secs(), 60);
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::default();
        let start = Instant::now();
        for _ in 0..11 {
            limiter.check_at("a", start);
        }
        let later = start + Duration::from_secs(61);
        let d = limiter.check_at("a", later);
        assert!(d.allowed);
        assert_eq!(d.remaining, 9);
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 1,
            ..Default::default()
        });
        let now = Instant::now();
        assert!(limiter.check_at("a", now).allowed);
        assert!(!limiter.check_at("a", now).allowed);
        assert!(limiter.check_at("b", now).allowed);
    }

    #[test]
    fn test_sweeps_expired_entries() {
        let limiter = RateLimiter::new(RateLimitConfig {
            sweep_threshold: 2,
            ..Default::default()
        });
        let start = Instant::now();
        for client in ["a", "b", "c"] {
            limiter.check_at(client, start);
        }
        assert_eq!(limiter.tracked_clients(), 3);
        limiter.check_at("d", start + Duration::from_secs(120));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_concurrent_checks_never_exceed_limit() {
        let limiter = Arc::new(RateLimiter::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || (0..5).filter(|_| limiter.check("shared").allowed).count())
            })
            .collect();
        let allowed: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(allowed, 10);
    }
}
