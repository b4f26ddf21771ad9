//! Similarity Ranker: scores every resume against the job description and
//! keeps the top K.
//!
//! Flow: validate → embed job text once → fan out document embeddings
//! (bounded by `concurrency`) → cosine score → merge in input order →
//! stable sort by score descending → truncate.
//!
//! A document whose embedding fails is reported in `failures`; it never
//! aborts the batch and never silently disappears.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::matching::models::{Document, RankFailure, RankedCandidate, RankingReport};
use crate::matching::similarity::{cosine_similarity, l2_norm};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("job description text cannot be empty")]
    EmptyJobText,

    #[error("top_k must be at least 1")]
    InvalidTopK,

    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),

    #[error("failed to embed job description: {0}")]
    JobEmbedding(EmbeddingError),
}

pub struct Ranker {
    embedder: Arc<dyn EmbeddingProvider>,
    concurrency: usize,
}

impl Ranker {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, concurrency: usize) -> Self {
        Self {
            embedder,
            concurrency: concurrency.max(1),
        }
    }

    /// Ranks `documents` against `job_text`, returning at most `top_k` results.
    ///
    /// Only request validation and a failed job embedding are errors. Per-document
    /// problems land in `RankingReport::failures`.
    pub async fn rank(
        &self,
        job_text: &str,
        documents: &[Document],
        top_k: usize,
    ) -> Result<RankingReport, RankError> {
        if job_text.trim().is_empty() {
            return Err(RankError::EmptyJobText);
        }
        if top_k == 0 {
            return Err(RankError::InvalidTopK);
        }
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(RankError::DuplicateDocument(doc.id.clone()));
            }
        }

        let job_embedding = self
            .embedder
            .embed(job_text)
            .await
            .map_err(RankError::JobEmbedding)?;
        let norm = l2_norm(&job_embedding);
        if !(norm > 0.0 && norm.is_finite()) {
            return Err(RankError::JobEmbedding(EmbeddingError::DegenerateVector));
        }
        let job_embedding = job_embedding.as_slice();

        // Built eagerly: a lazy borrowing `map` on the stream is not `Send`.
        let scoring: Vec<BoxFuture<'_, (usize, Result<f32, EmbeddingError>)>> = documents
            .iter()
            .enumerate()
            .map(|(idx, doc)| -> BoxFuture<'_, _> {
                Box::pin(async move { (idx, self.score_document(job_embedding, doc).await) })
            })
            .collect();

        let mut outcomes: Vec<(usize, Result<f32, EmbeddingError>)> = stream::iter(scoring)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; restore input order before sorting.
        outcomes.sort_by_key(|(idx, _)| *idx);

        let mut scored: Vec<(&Document, f32)> = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();

        for (idx, outcome) in outcomes {
            let doc = &documents[idx];
            match outcome {
                Ok(score) => scored.push((doc, score)),
                Err(e) => {
                    warn!(document = %doc.id, error = %e, "Failed to score document");
                    failures.push(RankFailure {
                        id: doc.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // `sort_by` is stable: equal scores keep input order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        let results: Vec<RankedCandidate> = scored
            .into_iter()
            .enumerate()
            .map(|(i, (doc, score))| RankedCandidate::new(i + 1, &doc.id, score))
            .collect();

        info!(
            "Ranked {} documents with {}: {} returned, {} failed",
            documents.len(),
            self.embedder.model_name(),
            results.len(),
            failures.len()
        );

        Ok(RankingReport {
            ranking_id: Uuid::new_v4(),
            ranked_at: Utc::now(),
            total_documents: documents.len(),
            results,
            failures,
        })
    }

    async fn score_document(&self, job: &[f32], doc: &Document) -> Result<f32, EmbeddingError> {
        if doc.text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let embedding = self.embedder.embed(&doc.text).await?;
        cosine_similarity(job, &embedding)
    }
}
