// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Review Guard
//!
//! Spam filtering and rate limiting for customer reviews on a taxi booking
//! site:
//!
//! - Multilingual prohibited-word table (Turkish, English, Russian, Greek)
//! - Additive heuristic spam scorer with configurable weights and threshold
//! - Fixed-window per-IP rate limiter with an injectable clock
//! - Review submission, listing and moderation over HTTP

pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lexicon;
pub mod limiter;
pub mod metrics;
pub mod review;
pub mod spam;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::Config;
pub use limiter::{RateLimitResult, RateLimiter, RateLimiters};
pub use review::{Review, ReviewStore, ReviewSubmission};
pub use spam::{SpamAnalysis, SpamReason, SpamScorer};
