// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter keyed by client identifier.
//!
//! Each identifier owns one window: the first request opens it with a count
//! of 1 and a reset time of `now + window`. Requests inside the window are
//! admitted until the count reaches the limit; the first request at or after
//! the reset time opens a fresh window.
//!
//! State is in-process only and not shared between instances.

use crate::clock::{Clock, SystemClock};
use crate::config::WindowConfig;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the window resets
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }
}

/// Window state for one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowRecord {
    count: u32,
    /// Epoch milliseconds at which the window expires
    reset_at: u64,
}

/// Thread-safe fixed-window rate limiter.
pub struct RateLimiter<C: Clock = SystemClock> {
    config: WindowConfig,
    clock: C,
    records: Mutex<HashMap<String, WindowRecord>>,
}

impl RateLimiter<SystemClock> {
    /// Create a rate limiter on the wall clock.
    pub fn new(config: WindowConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Create a rate limiter reading time from `clock`.
    pub fn with_clock(config: WindowConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            records: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> WindowConfig {
        self.config
    }

    /// Record a request from `id` and report whether it is admitted.
    pub fn check(&self, id: &str) -> RateLimitResult {
        let now = self.clock.now_ms();
        let mut records = self.records.lock();

        match records.get_mut(id) {
            Some(record) if now < record.reset_at => {
                let reset_in = Duration::from_millis(record.reset_at - now);
                if record.count >= self.config.max_requests {
                    debug!(id, count = record.count, ?reset_in, "Rate limit exceeded");
                    return RateLimitResult::Limited {
                        retry_after: reset_in,
                    };
                }
                record.count += 1;
                RateLimitResult::Allowed {
                    remaining: self.config.max_requests - record.count,
                    reset_in,
                }
            }
            _ => {
                records.insert(
                    id.to_string(),
                    WindowRecord {
                        count: 1,
                        reset_at: now.saturating_add(self.config.window_ms),
                    },
                );
                RateLimitResult::Allowed {
                    remaining: self.config.max_requests.saturating_sub(1),
                    reset_in: self.config.window_duration(),
                }
            }
        }
    }

    /// Record a request from `id`; true if admitted.
    pub fn is_allowed(&self, id: &str) -> bool {
        self.check(id).is_allowed()
    }

    /// Requests `id` may still make in its current window.
    ///
    /// Does not look at the clock: an expired window still reports its old
    /// count until the next request or sweep replaces it.
    pub fn remaining(&self, id: &str) -> u32 {
        match self.records.lock().get(id) {
            Some(record) => self.config.max_requests.saturating_sub(record.count),
            None => self.config.max_requests,
        }
    }

    /// Epoch milliseconds at which `id`'s window resets, or now if it has none.
    pub fn reset_time(&self, id: &str) -> u64 {
        match self.records.lock().get(id) {
            Some(record) => record.reset_at,
            None => self.clock.now_ms(),
        }
    }

    /// Remove records whose window has ended. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = self.clock.now_ms();
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, record| record.reset_at > now);
        let removed = before - records.len();
        if removed > 0 {
            debug!(removed, remaining = records.len(), "Swept expired rate limit windows");
        }
        removed
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.records.lock().len()
    }
}

/// The limiters the service applies per client IP.
pub struct RateLimiters<C: Clock = SystemClock> {
    /// Every `/api/` request
    pub api: RateLimiter<C>,
    /// Review submissions
    pub reviews: RateLimiter<C>,
}

impl<C: Clock + Clone> RateLimiters<C> {
    pub fn with_clock(api: WindowConfig, reviews: WindowConfig, clock: C) -> Self {
        Self {
            api: RateLimiter::with_clock(api, clock.clone()),
            reviews: RateLimiter::with_clock(reviews, clock),
        }
    }
}

impl<C: Clock> RateLimiters<C> {
    /// Sweep every limiter.
    pub fn cleanup(&self) -> usize {
        self.api.cleanup() + self.reviews.cleanup()
    }
}

/// Spawn a task sweeping `limiters` every `interval`.
pub fn spawn_cleanup<C: Clock + 'static>(
    limiters: Arc<RateLimiters<C>>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            limiters.cleanup();
        }
    })
}
