//! Axum route handlers for the candidate matching API.

use std::time::Duration;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::matching::models::{Document, FitSummary, RankingReport};
use crate::matching::summarizer::fallback_summary;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_text: String,
    /// Resume texts keyed by id, in the order the caller uploaded them.
    pub resumes: Vec<Document>,
    pub top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub job_text: String,
    pub resume_text: String,
    pub candidate_id: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/rank
///
/// Ranks resumes against a job description. Resumes that could not be
/// embedded come back under `failures` instead of failing the request.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankingReport>, AppError> {
    if request.resumes.is_empty() {
        return Err(AppError::Validation(
            "at least one resume is required".to_string(),
        ));
    }

    let top_k = request.top_k.unwrap_or(state.config.default_top_k);
    let report = state
        .ranker
        .rank(&request.job_text, &request.resumes, top_k)
        .await?;

    Ok(Json(report))
}

/// POST /api/v1/candidates/summary
///
/// Returns a fit explanation for one candidate. Always 200 for valid input;
/// `degraded: true` means the model was unavailable or missed the deadline.
/// A client disconnect drops this future, which drops the in-flight call.
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<FitSummary>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let candidate = request.candidate_id.as_deref();
    let deadline = tokio::time::sleep(Duration::from_secs(state.config.summary_timeout_secs));

    let summary = state
        .summarizer
        .summarize_until(&request.job_text, &request.resume_text, candidate, deadline)
        .await
        .unwrap_or_else(|| {
            warn!(
                "Summary timed out after {}s; using fallback",
                state.config.summary_timeout_secs
            );
            fallback_summary(candidate)
        });

    Ok(Json(summary))
}
