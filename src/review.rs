// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Customer reviews: submission validation, the stored record and an
//! in-memory store.

use crate::spam::SpamAnalysis;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

static SCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("script scheme pattern is valid"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on\w+=").expect("event handler pattern is valid"));

/// Submission rejected before spam scoring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i64),
}

/// Review as posted by a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub rating: i64,
}

impl ReviewSubmission {
    /// Sanitize the free-text fields and check required fields and rating.
    pub fn validate(self) -> Result<ValidSubmission, ReviewError> {
        let name = sanitize_text(&self.name);
        let text = sanitize_text(&self.text);

        if name.is_empty() {
            return Err(ReviewError::MissingField("name"));
        }
        if text.is_empty() {
            return Err(ReviewError::MissingField("text"));
        }
        let rating = u8::try_from(self.rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or(ReviewError::InvalidRating(self.rating))?;

        Ok(ValidSubmission { name, text, rating })
    }
}

/// Sanitized submission ready for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub text: String,
    pub rating: u8,
}

/// Strip markup and script injection vectors from user text.
pub fn sanitize_text(input: &str) -> String {
    let without_tags: String = input.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let without_scheme = SCRIPT_SCHEME.replace_all(&without_tags, "");
    EVENT_HANDLER.replace_all(&without_scheme, "").into_owned()
}

/// Stored review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    pub text: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub approved: bool,
    pub is_spam: bool,
    pub spam_score: u32,
    pub spam_reasons: Vec<String>,
}

impl Review {
    /// Build the record for a scored submission. Spam is stored unapproved.
    pub fn from_submission(
        submission: ValidSubmission,
        analysis: &SpamAnalysis,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: submission.name,
            text: submission.text,
            rating: submission.rating,
            created_at,
            approved: !analysis.is_spam,
            is_spam: analysis.is_spam,
            spam_score: analysis.spam_score,
            spam_reasons: analysis.reasons.iter().map(ToString::to_string).collect(),
        }
    }
}

/// In-memory review store.
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: RwLock<HashMap<Uuid, Review>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, review: Review) -> Uuid {
        let id = review.id;
        self.reviews.write().await.insert(id, review);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Review> {
        self.reviews.read().await.get(&id).cloned()
    }

    /// Reviews newest first; unapproved ones only when `include_unapproved`.
    pub async fn list(&self, include_unapproved: bool) -> Vec<Review> {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .await
            .values()
            .filter(|r| include_unapproved || r.approved)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews
    }

    /// Remove a review. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> bool {
        self.reviews.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.reviews.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.reviews.read().await.is_empty()
    }
}
