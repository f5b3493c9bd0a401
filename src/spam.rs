// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Comment spam scorer.
//!
//! A single pass of independent, additive signals:
//! - Prohibited words from the multilingual [`Lexicon`]
//! - Body too short / too long
//! - Runs of one repeated character
//! - Excessive uppercase or digits
//! - Links and domain names
//! - Author name length
//!
//! The scorer is total: any input yields a well-formed [`SpamAnalysis`].

use crate::config::{MatchWeighting, SpamConfig};
use crate::lexicon::{Category, Lexicon};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://|www\.|\.com|\.net|\.org").expect("link pattern is valid")
});

/// Why a comment scored points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpamReason {
    Threat,
    TurkishInsult,
    EnglishInsult,
    RussianInsult,
    GreekInsult,
    Advertising,
    TooShort { min: usize },
    TooLong { max: usize },
    RepeatedCharacters,
    ExcessiveUppercase,
    ExcessiveDigits,
    ContainsLink,
    InvalidName { min: usize, max: usize },
}

impl From<Category> for SpamReason {
    fn from(category: Category) -> Self {
        match category {
            Category::Threat => Self::Threat,
            Category::TurkishInsult => Self::TurkishInsult,
            Category::EnglishInsult => Self::EnglishInsult,
            Category::RussianInsult => Self::RussianInsult,
            Category::GreekInsult => Self::GreekInsult,
            Category::Advertising => Self::Advertising,
        }
    }
}

impl fmt::Display for SpamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Threat => write!(f, "Threatening or violent language detected"),
            Self::TurkishInsult => write!(f, "Contains Turkish insults"),
            Self::EnglishInsult => write!(f, "Contains English insults"),
            Self::RussianInsult => write!(f, "Contains Russian insults"),
            Self::GreekInsult => write!(f, "Contains Greek insults"),
            Self::Advertising => write!(f, "Spam or advertising content detected"),
            Self::TooShort { min } => write!(f, "Comment too short (at least {min} characters)"),
            Self::TooLong { max } => write!(f, "Comment too long (at most {max} characters)"),
            Self::RepeatedCharacters => write!(f, "Too many repeated characters"),
            Self::ExcessiveUppercase => write!(f, "Too much uppercase text"),
            Self::ExcessiveDigits => write!(f, "Too many digits"),
            Self::ContainsLink => write!(f, "Links and advertising are not allowed"),
            Self::InvalidName { min, max } => {
                write!(f, "Invalid name (must be {min}-{max} characters)")
            }
        }
    }
}

impl Serialize for SpamReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Verdict for one comment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamAnalysis {
    pub is_spam: bool,
    pub spam_score: u32,
    pub reasons: Vec<SpamReason>,
    /// Distinct prohibited terms found, for moderators
    #[serde(skip)]
    pub matched_terms: Vec<&'static str>,
}

impl SpamAnalysis {
    pub fn has_reason(&self, reason: SpamReason) -> bool {
        self.reasons.contains(&reason)
    }

    /// Message shown to the author when the comment is rejected, in the
    /// language of the most serious finding.
    pub fn rejection_message(&self) -> &'static str {
        let has = |r| self.has_reason(r);
        if has(SpamReason::Threat) {
            "Bu mesaj tehdit içeriyor, üzgünüz yayınlayamıyoruz."
        } else if has(SpamReason::TurkishInsult) {
            "Bu mesaj hakaret içeriyor, üzgünüz yayınlayamıyoruz."
        } else if has(SpamReason::EnglishInsult) {
            "This message contains insults, sorry we cannot publish it."
        } else if has(SpamReason::RussianInsult) {
            "Это сообщение содержит оскорбления, извините, мы не можем его опубликовать."
        } else if has(SpamReason::GreekInsult) {
            "Αυτό το μήνυμα περιέχει προσβολές, λυπούμαστε αλλά δεν μπορούμε να το δημοσιεύσουμε."
        } else if has(SpamReason::ContainsLink) {
            "Link ve reklam içeren yorumlar yasaktır, üzgünüz yayınlayamıyoruz."
        } else if has(SpamReason::Advertising) {
            "Spam ve reklam içeriği tespit edildi, üzgünüz yayınlayamıyoruz."
        } else {
            "Üzgünüz, yorumunuz yayınlanamadı. Lütfen daha uygun bir dil kullanın."
        }
    }
}

/// Heuristic comment classifier.
#[derive(Debug, Clone)]
pub struct SpamScorer {
    config: SpamConfig,
    lexicon: &'static Lexicon,
}

impl Default for SpamScorer {
    fn default() -> Self {
        Self::new(SpamConfig::default())
    }
}

impl SpamScorer {
    /// Create a scorer over the builtin lexicon.
    pub fn new(config: SpamConfig) -> Self {
        Self {
            config,
            lexicon: Lexicon::builtin(),
        }
    }

    pub fn config(&self) -> &SpamConfig {
        &self.config
    }

    /// Score a comment body and its author name.
    pub fn analyze(&self, text: &str, name: &str) -> SpamAnalysis {
        let cfg = &self.config;
        let weights = &cfg.weights;
        let mut score = 0u32;
        let mut reasons = Vec::new();

        let matches = self.lexicon.find_matches(&text.to_lowercase());
        for m in &matches {
            let hits = match cfg.match_weighting {
                MatchWeighting::PerOccurrence => m.occurrences as u32,
                MatchWeighting::PerDistinctTerm => 1,
            };
            score = score.saturating_add(weights.prohibited_word.saturating_mul(hits));
        }
        for category in Category::ALL {
            if matches.iter().any(|m| m.category == category) {
                reasons.push(SpamReason::from(category));
            }
        }

        let stats = TextStats::of(text);

        if stats.chars < cfg.min_text_chars {
            score += weights.too_short;
            reasons.push(SpamReason::TooShort {
                min: cfg.min_text_chars,
            });
        }

        if stats.chars > cfg.max_text_chars {
            score += weights.too_long;
            reasons.push(SpamReason::TooLong {
                max: cfg.max_text_chars,
            });
        }

        if has_repeated_run(text, cfg.repeat_run) {
            score += weights.repeated_chars;
            reasons.push(SpamReason::RepeatedCharacters);
        }

        if stats.ratio(stats.uppercase) > cfg.max_uppercase_ratio {
            score += weights.excessive_uppercase;
            reasons.push(SpamReason::ExcessiveUppercase);
        }

        if stats.ratio(stats.digits) > cfg.max_digit_ratio {
            score += weights.excessive_digits;
            reasons.push(SpamReason::ExcessiveDigits);
        }

        if LINK_PATTERN.is_match(text) {
            score += weights.link;
            reasons.push(SpamReason::ContainsLink);
        }

        let name_chars = name.chars().count();
        if name_chars < cfg.min_name_chars || name_chars > cfg.max_name_chars {
            score += weights.invalid_name;
            reasons.push(SpamReason::InvalidName {
                min: cfg.min_name_chars,
                max: cfg.max_name_chars,
            });
        }

        SpamAnalysis {
            is_spam: score >= cfg.threshold,
            spam_score: score,
            reasons,
            matched_terms: matches.iter().map(|m| m.term).collect(),
        }
    }
}

/// Character counts of a comment body.
struct TextStats {
    chars: usize,
    uppercase: usize,
    digits: usize,
}

impl TextStats {
    fn of(text: &str) -> Self {
        let mut stats = Self {
            chars: 0,
            uppercase: 0,
            digits: 0,
        };
        for c in text.chars() {
            stats.chars += 1;
            if c.is_uppercase() {
                stats.uppercase += 1;
            } else if c.is_ascii_digit() {
                stats.digits += 1;
            }
        }
        stats
    }

    /// Share of `count` in the body; 0 for an empty body.
    fn ratio(&self, count: usize) -> f64 {
        if self.chars == 0 {
            0.0
        } else {
            count as f64 / self.chars as f64
        }
    }
}

/// True if some character occurs `run` or more times in a row.
///
/// Line breaks never form a run, so blank lines between paragraphs are fine.
fn has_repeated_run(text: &str, run: usize) -> bool {
    let mut previous = None;
    let mut length = 0usize;
    for c in text.chars() {
        if matches!(c, '\n' | '\r') {
            previous = None;
            length = 0;
            continue;
        }
        if previous == Some(c) {
            length += 1;
        } else {
            previous = Some(c);
            length = 1;
        }
        if length >= run {
            return true;
        }
    }
    false
}
