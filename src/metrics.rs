// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for moderation and rate limiting.

use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Service metrics on a private registry.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    reviews: IntCounterVec,
    rate_limited: IntCounterVec,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let reviews = IntCounterVec::new(
            Opts::new("review_guard_reviews_total", "Review submissions by verdict"),
            &["verdict"],
        )?;
        let rate_limited = IntCounterVec::new(
            Opts::new(
                "review_guard_rate_limited_total",
                "Requests rejected by a rate limiter",
            ),
            &["limiter"],
        )?;

        registry.register(Box::new(reviews.clone()))?;
        registry.register(Box::new(rate_limited.clone()))?;

        Ok(Self {
            registry,
            reviews,
            rate_limited,
        })
    }

    pub fn record_review(&self, is_spam: bool) {
        let verdict = if is_spam { "spam" } else { "accepted" };
        self.reviews.with_label_values(&[verdict]).inc();
    }

    pub fn record_rate_limited(&self, limiter: &str) {
        self.rate_limited.with_label_values(&[limiter]).inc();
    }

    /// Render the registry in the Prometheus text format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
