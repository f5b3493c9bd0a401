// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for review flood simulation.

use review_guard::spam::SpamReason;

/// Generate a pool of client IP strings for testing.
pub fn generate_ips(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{a}.{b}.{c}")
        })
        .collect()
}

/// Genuine customer reviews in every site language. Each scores 0.
pub fn clean_comments() -> Vec<&'static str> {
    vec![
        "Very good driver, clean car and polite service.",
        "Punctual pickup at the airport.",
        "Çok kibar ve dakik bir sürücü, teşekkürler.",
        "The ride to the hotel was quick and comfortable.",
        "Excellent service, we will book again next summer.",
        "Очень вежливый водитель, спасибо.",
        "Ευχαριστούμε για τη γρήγορη εξυπηρέτηση.",
        "Havalimanından otele rahat bir yolculuktu.",
        "Our luggage was handled with care, thank you.",
        "Friendly and professional, highly recommended.",
    ]
}

/// Abusive or promotional comments with the reason each must report.
/// Each scores at least the default threshold.
pub fn spam_comments() -> Vec<(&'static str, SpamReason)> {
    vec![
        ("you are an idiot and a moron", SpamReason::EnglishInsult),
        ("salak ve ahmak bir adam", SpamReason::TurkishInsult),
        ("ты дурак и дебил", SpamReason::RussianInsult),
        ("είσαι βλάκας και χαζός", SpamReason::GreekInsult),
        ("I will kill you and destroy your car", SpamReason::Threat),
        ("cheap rides at www.example today", SpamReason::ContainsLink),
        ("free money, win a discount now", SpamReason::Advertising),
        ("ücretsiz para kazan hemen", SpamReason::Advertising),
        ("GREAT RIDE!!!!! BEST DRIVER", SpamReason::RepeatedCharacters),
        ("bedava indirim fırsat kampanya", SpamReason::Advertising),
    ]
}

/// Simple deterministic "random" based on index and ratio.
pub fn rand_bool(ratio: f64, index: usize) -> bool {
    if ratio >= 1.0 {
        true
    } else if ratio <= 0.0 {
        false
    } else {
        (index as f64 * 0.618033988749895) % 1.0 < ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ips() {
        let ips = generate_ips(300);
        assert_eq!(ips.len(), 300);
        // All should be unique
        let unique: std::collections::HashSet<_> = ips.iter().collect();
        assert_eq!(unique.len(), 300);
        assert_eq!(ips[257], "10.0.1.1");
    }

    #[test]
    fn test_rand_bool_extremes() {
        assert!((0..10).all(|i| rand_bool(1.0, i)));
        assert!((0..10).all(|i| !rand_bool(0.0, i)));
    }
}
