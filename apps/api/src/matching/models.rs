//! Request-scoped data shared by the ranker, the summarizer and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resume as plain text plus a stable identifier (usually the uploaded filename).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Coarse label for a cosine score, used by callers for badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitTier {
    PerfectMatch,
    StrongFit,
    DecentFit,
    WeakFit,
}

impl FitTier {
    pub fn from_score(score: f32) -> Self {
        if score >= 0.85 {
            FitTier::PerfectMatch
        } else if score >= 0.75 {
            FitTier::StrongFit
        } else if score >= 0.65 {
            FitTier::DecentFit
        } else {
            FitTier::WeakFit
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub id: String,
    pub candidate_name: String,
    pub score: f32,
    pub tier: FitTier,
}

impl RankedCandidate {
    pub fn new(rank: usize, id: &str, score: f32) -> Self {
        Self {
            rank,
            id: id.to_string(),
            candidate_name: candidate_display_name(id),
            score,
            tier: FitTier::from_score(score),
        }
    }
}

/// A document that could not be scored, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankFailure {
    pub id: String,
    pub reason: String,
}

/// Output of one ranking request: scored candidates plus isolated failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub ranking_id: Uuid,
    pub ranked_at: DateTime<Utc>,
    pub total_documents: usize,
    /// Sorted by score descending, ties in input order, at most `top_k` long.
    pub results: Vec<RankedCandidate>,
    /// In input order.
    pub failures: Vec<RankFailure>,
}

/// A fit explanation. `degraded` is set when the text is the canned fallback
/// rather than a generated summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub text: String,
    pub degraded: bool,
}

/// Derives a readable name from a document id: `jane-doe.pdf` → `jane doe`.
pub fn candidate_display_name(id: &str) -> String {
    let stem = id
        .strip_suffix(".pdf")
        .or_else(|| id.strip_suffix(".docx"))
        .unwrap_or(id);
    stem.replace('-', " ").trim().to_string()
}
