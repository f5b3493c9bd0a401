// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the review guard service.
//!
//! Every field has a serde default, so a partial TOML/JSON document or an
//! empty environment yields the production defaults. Spam weights and the
//! threshold are tuning constants.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Configuration for the review guard service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Reverse proxies whose `X-Forwarded-For` header is honoured
    /// (default: none; the socket peer is the client)
    #[serde(default)]
    pub trusted_proxies: Vec<String>,

    /// Spam scoring configuration
    #[serde(default)]
    pub spam: SpamConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Admin access configuration
    #[serde(default)]
    pub admin: AdminConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// How prohibited-word matches are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchWeighting {
    /// Every non-overlapping occurrence of a term adds the weight
    PerOccurrence,
    /// Each distinct term adds the weight once
    PerDistinctTerm,
}

/// Score contributed by each spam signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamWeights {
    #[serde(default = "default_prohibited_word_weight")]
    pub prohibited_word: u32,
    #[serde(default = "default_length_weight")]
    pub too_short: u32,
    #[serde(default = "default_length_weight")]
    pub too_long: u32,
    #[serde(default = "default_repeated_chars_weight")]
    pub repeated_chars: u32,
    #[serde(default = "default_uppercase_weight")]
    pub excessive_uppercase: u32,
    #[serde(default = "default_digits_weight")]
    pub excessive_digits: u32,
    #[serde(default = "default_link_weight")]
    pub link: u32,
    #[serde(default = "default_length_weight")]
    pub invalid_name: u32,
}

/// Spam scorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamConfig {
    /// Score at or above which a comment is spam (default: 15)
    #[serde(default = "default_spam_threshold")]
    pub threshold: u32,

    #[serde(default)]
    pub weights: SpamWeights,

    /// Prohibited-word weighting (default: per_occurrence)
    #[serde(default = "default_match_weighting")]
    pub match_weighting: MatchWeighting,

    /// Minimum body length in characters (default: 10)
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Maximum body length in characters (default: 500)
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Minimum name length in characters (default: 2)
    #[serde(default = "default_min_name_chars")]
    pub min_name_chars: usize,

    /// Maximum name length in characters (default: 50)
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,

    /// Run length of one repeated character that counts as spam (default: 5)
    #[serde(default = "default_repeat_run")]
    pub repeat_run: usize,

    /// Uppercase ratio above which the body is shouting (default: 0.7)
    #[serde(default = "default_max_uppercase_ratio")]
    pub max_uppercase_ratio: f64,

    /// Digit ratio above which the body is number spam (default: 0.3)
    #[serde(default = "default_max_digit_ratio")]
    pub max_digit_ratio: f64,
}

/// One fixed-window limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Requests admitted per identifier per window
    pub max_requests: u32,
}

impl WindowConfig {
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Limit applied to every `/api/` request per IP (default: 100 per minute)
    #[serde(default = "default_api_window")]
    pub api: WindowConfig,

    /// Limit applied to review submissions per IP (default: 5 per hour)
    #[serde(default = "default_review_window")]
    pub reviews: WindowConfig,

    /// Interval between expired-record sweeps in seconds (default: 3600)
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

/// Admin access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Client IPs allowed to moderate reviews (default: loopback only)
    #[serde(default = "default_admin_allowed_ips")]
    pub allowed_ips: Vec<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_spam_threshold() -> u32 {
    15
}

fn default_prohibited_word_weight() -> u32 {
    10
}

fn default_length_weight() -> u32 {
    5
}

fn default_repeated_chars_weight() -> u32 {
    15
}

fn default_uppercase_weight() -> u32 {
    10
}

fn default_digits_weight() -> u32 {
    8
}

fn default_link_weight() -> u32 {
    20
}

fn default_match_weighting() -> MatchWeighting {
    MatchWeighting::PerOccurrence
}

fn default_min_text_chars() -> usize {
    10
}

fn default_max_text_chars() -> usize {
    500
}

fn default_min_name_chars() -> usize {
    2
}

fn default_max_name_chars() -> usize {
    50
}

fn default_repeat_run() -> usize {
    5
}

fn default_max_uppercase_ratio() -> f64 {
    0.7
}

fn default_max_digit_ratio() -> f64 {
    0.3
}

fn default_api_window() -> WindowConfig {
    WindowConfig {
        window_ms: 60 * 1000,
        max_requests: 100,
    }
}

fn default_review_window() -> WindowConfig {
    WindowConfig {
        window_ms: 60 * 60 * 1000,
        max_requests: 5,
    }
}

fn default_cleanup_interval_secs() -> u64 {
    3600
}

fn default_admin_allowed_ips() -> Vec<String> {
    vec!["127.0.0.1".to_string(), "::1".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            trusted_proxies: Vec::new(),
            spam: SpamConfig::default(),
            rate_limit: RateLimitConfig::default(),
            admin: AdminConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for SpamWeights {
    fn default() -> Self {
        Self {
            prohibited_word: default_prohibited_word_weight(),
            too_short: default_length_weight(),
            too_long: default_length_weight(),
            repeated_chars: default_repeated_chars_weight(),
            excessive_uppercase: default_uppercase_weight(),
            excessive_digits: default_digits_weight(),
            link: default_link_weight(),
            invalid_name: default_length_weight(),
        }
    }
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            threshold: default_spam_threshold(),
            weights: SpamWeights::default(),
            match_weighting: default_match_weighting(),
            min_text_chars: default_min_text_chars(),
            max_text_chars: default_max_text_chars(),
            min_name_chars: default_min_name_chars(),
            max_name_chars: default_max_name_chars(),
            repeat_run: default_repeat_run(),
            max_uppercase_ratio: default_max_uppercase_ratio(),
            max_digit_ratio: default_max_digit_ratio(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            api: default_api_window(),
            reviews: default_review_window(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            allowed_ips: default_admin_allowed_ips(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl RateLimitConfig {
    /// Get the cleanup sweep interval (at least one second)
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults.
    ///
    /// Unset or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(v) = parse_var(&lookup, "API_WINDOW_MS") {
            config.rate_limit.api.window_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "API_MAX_REQUESTS") {
            config.rate_limit.api.max_requests = v;
        }
        if let Some(v) = parse_var(&lookup, "REVIEW_WINDOW_MS") {
            config.rate_limit.reviews.window_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "REVIEW_MAX_REQUESTS") {
            config.rate_limit.reviews.max_requests = v;
        }
        if let Some(v) = parse_var(&lookup, "CLEANUP_INTERVAL_SECS") {
            config.rate_limit.cleanup_interval_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "SPAM_THRESHOLD") {
            config.spam.threshold = v;
        }
        if let Some(ips) = lookup("ADMIN_ALLOWED_IPS") {
            config.admin.allowed_ips = parse_list(&ips);
        }
        if let Some(proxies) = lookup("TRUSTED_PROXIES") {
            config.trusted_proxies = parse_list(&proxies);
        }
        if let Some(enabled) = parse_var(&lookup, "METRICS_ENABLED") {
            config.metrics.enabled = enabled;
        }
        config
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.spam.threshold, 15);
        assert_eq!(config.spam.weights.link, 20);
        assert_eq!(config.spam.match_weighting, MatchWeighting::PerOccurrence);
        assert_eq!(config.rate_limit.reviews.max_requests, 5);
        assert_eq!(
            config.rate_limit.reviews.window_duration(),
            Duration::from_secs(3600)
        );
        assert_eq!(config.rate_limit.api.max_requests, 100);
        assert!(config.trusted_proxies.is_empty());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{"spam": {"threshold": 30, "match_weighting": "per_distinct_term"}}"#,
        )
        .unwrap();
        assert_eq!(config.spam.threshold, 30);
        assert_eq!(config.spam.match_weighting, MatchWeighting::PerDistinctTerm);
        assert_eq!(config.spam.weights.prohibited_word, 10);
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("REVIEW_MAX_REQUESTS", "2"),
            ("API_WINDOW_MS", "1000"),
            ("SPAM_THRESHOLD", "not-a-number"),
            ("ADMIN_ALLOWED_IPS", "10.0.0.1, 10.0.0.2,"),
            ("METRICS_ENABLED", "false"),
            ("TRUSTED_PROXIES", "10.0.0.254"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.rate_limit.reviews.max_requests, 2);
        assert_eq!(config.rate_limit.api.window_ms, 1000);
        assert_eq!(config.spam.threshold, 15);
        assert_eq!(config.admin.allowed_ips, vec!["10.0.0.1", "10.0.0.2"]);
        assert!(!config.metrics.enabled);
        assert_eq!(config.trusted_proxies, vec!["10.0.0.254"]);
    }
}
