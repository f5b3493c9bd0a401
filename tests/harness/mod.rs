// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for review flood simulation.
//!
//! This module provides utilities for replaying abusive submission patterns
//! against the review limiter and spam scorer.

pub mod attacks;
pub mod generators;
pub mod metrics;
