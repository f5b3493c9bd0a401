// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Flood patterns for security testing.
//!
//! Time is simulated: the runner advances a manual clock by
//! `interval_ms` between submissions, so an hour-long pattern runs
//! instantly and deterministically.

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Simulated gap between submissions in milliseconds
    pub interval_ms: u64,
    /// Number of unique IPs to rotate through
    pub unique_ips: usize,
    /// Share of submissions drawn from the spam corpus (0.0-1.0)
    pub spam_ratio: f64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            interval_ms: 1000,
            unique_ips: 1,
            spam_ratio: 0.0,
        }
    }
}

/// Predefined flood patterns.
impl FloodConfig {
    /// Single IP posting a review every second.
    pub fn single_ip_flood() -> Self {
        Self {
            total_requests: 200,
            interval_ms: 1000,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Many IPs, few reviews each.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 500,
            interval_ms: 100,
            unique_ips: 100,
            ..Default::default()
        }
    }

    /// Mixed abusive and genuine reviews from a crowd.
    pub fn spam_campaign() -> Self {
        Self {
            total_requests: 200,
            interval_ms: 10,
            unique_ips: 100,
            spam_ratio: 0.5,
        }
    }

    /// One IP posting every 13 minutes, under 5 per hour.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 20,
            interval_ms: 13 * 60 * 1000,
            unique_ips: 1,
            ..Default::default()
        }
    }

    /// Simulated duration of the pattern in milliseconds.
    pub fn expected_duration_ms(&self) -> u64 {
        self.total_requests as u64 * self.interval_ms
    }
}
