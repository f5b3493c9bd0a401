// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prohibited-word table used by the spam scorer.
//!
//! Terms are grouped by [`Category`]. Matching is a case-insensitive
//! substring search over the lowercased comment body, so short terms also
//! fire inside longer words. The table is deliberately data, not code: the
//! tests below assert coverage and the known false positives directly.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Category of a prohibited term, in reason-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Threats and violence (all languages)
    Threat,
    TurkishInsult,
    EnglishInsult,
    RussianInsult,
    GreekInsult,
    /// Spam and advertising terms (all languages)
    Advertising,
}

impl Category {
    /// All categories, highest reason priority first.
    pub const ALL: [Category; 6] = [
        Category::Threat,
        Category::TurkishInsult,
        Category::EnglishInsult,
        Category::RussianInsult,
        Category::GreekInsult,
        Category::Advertising,
    ];

    /// Raw terms for this category. May contain duplicates; [`Lexicon`]
    /// removes them.
    pub fn terms(self) -> &'static [&'static str] {
        match self {
            Category::Threat => THREATS,
            Category::TurkishInsult => TURKISH_INSULTS,
            Category::EnglishInsult => ENGLISH_INSULTS,
            Category::RussianInsult => RUSSIAN_INSULTS,
            Category::GreekInsult => GREEK_INSULTS,
            Category::Advertising => ADVERTISING,
        }
    }
}

const TURKISH_INSULTS: &[&str] = &[
    "aptal", "salak", "gerizekalı", "ahmak", "beyinsiz", "şoför", "küfür", "hakaret", "sapık",
    "çirkin", "iğrenç", "pislik", "ahmak", "dangalak", "salak", "mal", "ahmak", "budala",
];

const ENGLISH_INSULTS: &[&str] = &[
    "idiot", "stupid", "fool", "moron", "dumb", "asshole", "bitch", "bastard", "fuck", "shit",
    "damn", "hell", "stupid", "foolish", "ignorant", "retarded", "imbecile",
];

const RUSSIAN_INSULTS: &[&str] = &[
    "идиот", "дурак", "тупица", "дебил", "кретин", "придурок", "сука", "блять", "хуй", "пизда",
    "говно", "дерьмо", "мудак", "козел", "сволочь", "подонок", "ублюдок",
];

const GREEK_INSULTS: &[&str] = &[
    "ηλίθιος", "βλάκας", "χαζός", "κρετίνος", "μαλάκας", "αρχίδι", "γαμώτο", "σκατά", "πουτάνα",
    "μαλάκα", "βρωμιάρης", "παλιάνθρωπος",
];

const THREATS: &[&str] = &[
    // Turkish
    "öldür", "katlet", "vur", "döv", "kır", "öldüreceğim", "yok edeceğim",
    // English
    "kill", "murder", "beat", "break", "destroy", "eliminate", "annihilate",
    // Russian
    "убить", "убивать", "уничтожить", "разбить", "сломать", "истребить",
    // Greek
    "σκοτώσω", "θανατώσω", "καταστρέψω", "θα σκοτώσω", "θα σε σκοτώσω",
];

const ADVERTISING: &[&str] = &[
    // Turkish
    "kazan", "para", "ücretsiz", "bedava", "indirim", "fırsat", "kampanya",
    // English
    "win", "money", "free", "discount", "offer", "opportunity", "chance",
    // Russian
    "выиграй", "деньги", "бесплатно", "скидка", "предложение", "шанс",
    // Greek
    "κερδίστε", "χρήματα", "δωρεάν", "έκπτωση", "προσφορά", "ευκαιρία",
];

/// A term found in a comment body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub term: &'static str,
    pub category: Category,
    /// Non-overlapping occurrences in the lowercased body (always >= 1)
    pub occurrences: usize,
}

/// De-duplicated, lowercased prohibited-word table.
#[derive(Debug)]
pub struct Lexicon {
    entries: Vec<(Category, &'static str)>,
}

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(|| Lexicon::new(Category::ALL));

impl Lexicon {
    /// Build a lexicon from the given categories. A term listed more than
    /// once is kept only under its first category.
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for category in categories {
            for &term in category.terms() {
                if seen.insert(term) {
                    entries.push((category, term));
                }
            }
        }
        Self { entries }
    }

    /// The full multilingual table.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct terms of one category.
    pub fn terms_in(&self, category: Category) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .filter(move |(c, _)| *c == category)
            .map(|(_, term)| *term)
    }

    /// Find every term contained in `lowered`, which must already be
    /// lowercased. Results follow table order.
    pub fn find_matches(&self, lowered: &str) -> Vec<TermMatch> {
        self.entries
            .iter()
            .filter_map(|&(category, term)| {
                let occurrences = lowered.matches(term).count();
                (occurrences > 0).then_some(TermMatch {
                    term,
                    category,
                    occurrences,
                })
            })
            .collect()
    }
}
