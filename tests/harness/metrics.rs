// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for review flood simulation results.

use std::collections::HashMap;

/// Collects metrics during a flood simulation.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    /// Count of submissions by outcome
    outcomes: HashMap<Outcome, usize>,
    /// Count of submissions by IP
    requests_per_ip: HashMap<String, usize>,
    /// Clean comments flagged as spam
    false_positives: usize,
    /// Spam comments published
    false_negatives: usize,
}

/// Possible outcomes for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Published,
    FlaggedSpam,
    RateLimited,
}

impl FloodMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submission outcome. `expected_spam` is the corpus label.
    pub fn record(&mut self, outcome: Outcome, ip: &str, expected_spam: bool) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
        *self.requests_per_ip.entry(ip.to_string()).or_insert(0) += 1;
        match (outcome, expected_spam) {
            (Outcome::FlaggedSpam, false) => self.false_positives += 1,
            (Outcome::Published, true) => self.false_negatives += 1,
            _ => {}
        }
    }

    /// Get total submission count.
    pub fn total_requests(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Get count for a specific outcome.
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Get block rate (ratio of rate limited to total).
    pub fn block_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        self.count(Outcome::RateLimited) as f64 / total as f64
    }

    /// Generate a summary report.
    pub fn report(&self) -> FloodReport {
        FloodReport {
            total_requests: self.total_requests(),
            published: self.count(Outcome::Published),
            flagged_spam: self.count(Outcome::FlaggedSpam),
            rate_limited: self.count(Outcome::RateLimited),
            false_positives: self.false_positives,
            false_negatives: self.false_negatives,
            block_rate: self.block_rate(),
            unique_ips: self.requests_per_ip.len(),
        }
    }
}

/// Summary report of flood metrics.
#[derive(Debug, Clone)]
pub struct FloodReport {
    pub total_requests: usize,
    pub published: usize,
    pub flagged_spam: usize,
    pub rate_limited: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub block_rate: f64,
    pub unique_ips: usize,
}

impl FloodReport {
    /// Submissions that reached the scorer.
    pub fn admitted(&self) -> usize {
        self.published + self.flagged_spam
    }
}

impl std::fmt::Display for FloodReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Review Flood Report ===")?;
        writeln!(f, "Total Requests:    {}", self.total_requests)?;
        writeln!(f, "Unique IPs:        {}", self.unique_ips)?;
        writeln!(f)?;
        writeln!(f, "--- Outcomes ---")?;
        writeln!(f, "Published:         {}", self.published)?;
        writeln!(f, "Flagged Spam:      {}", self.flagged_spam)?;
        writeln!(f, "Rate Limited:      {}", self.rate_limited)?;
        writeln!(f, "Block Rate:        {:.1}%", self.block_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Classifier ---")?;
        writeln!(f, "False Positives:   {}", self.false_positives)?;
        writeln!(f, "False Negatives:   {}", self.false_negatives)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collection() {
        let mut metrics = FloodMetrics::new();

        metrics.record(Outcome::Published, "10.0.0.1", false);
        metrics.record(Outcome::FlaggedSpam, "10.0.0.1", false);
        metrics.record(Outcome::Published, "10.0.0.2", true);
        metrics.record(Outcome::RateLimited, "10.0.0.2", true);

        let report = metrics.report();
        assert_eq!(report.total_requests, 4);
        assert_eq!(report.admitted(), 3);
        assert_eq!(report.false_positives, 1);
        assert_eq!(report.false_negatives, 1);
        assert_eq!(report.unique_ips, 2);
        assert!((report.block_rate - 0.25).abs() < 0.01);
    }
}
