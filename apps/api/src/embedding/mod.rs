//! Embedding Provider: turns text into fixed-length vectors.
//!
//! Production: `RemoteEmbedder` (OpenAI embeddings via `llm_client`).
//! Demo mode only: `DemoEmbedder`, which wraps another provider and substitutes a
//! deterministic placeholder vector when the remote call fails.
//!
//! `Ranker` holds an `Arc<dyn EmbeddingProvider>`, chosen at startup by `build_embedder`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::llm_client::{truncate_chars, LlmError, OpenAiClient};

/// Placeholder dimension before any real vector has been seen,
/// matching `text-embedding-3-small` and `text-embedding-ada-002`.
pub const PLACEHOLDER_DIMENSION: usize = 1536;

/// Best guess at the output dimension of a known embedding model.
pub fn placeholder_dimension(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => PLACEHOLDER_DIMENSION,
    }
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("input text is empty")]
    EmptyInput,

    #[error("embedding request failed: {0}")]
    Failure(#[from] LlmError),

    #[error("embedding vector has zero norm")]
    DegenerateVector,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn model_name(&self) -> &str;
}

// ────────────────────────────────────────────────────────────────────────────
// RemoteEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Calls the remote embedding model, truncating oversized input first.
pub struct RemoteEmbedder {
    client: OpenAiClient,
    model: String,
    max_input_chars: usize,
}

impl RemoteEmbedder {
    pub fn new(client: OpenAiClient, model: String, max_input_chars: usize) -> Self {
        Self {
            client,
            model,
            max_input_chars,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let input = truncate_chars(text, self.max_input_chars);
        if input.len() < text.len() {
            debug!(
                "Truncated embedding input from {} to {} bytes",
                text.len(),
                input.len()
            );
        }

        Ok(self.client.embed(&self.model, input).await?)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

// ────────────────────────────────────────────────────────────────────────────
// DemoEmbedder
// ────────────────────────────────────────────────────────────────────────────

/// Demo-mode wrapper: remote failures become placeholder vectors instead of errors.
///
/// Placeholder scores carry no meaning. Never construct this outside demo mode.
///
/// Placeholders take the length of the last real vector returned by `inner`,
/// so they stay comparable when the model changes.
pub struct DemoEmbedder {
    inner: Arc<dyn EmbeddingProvider>,
    dimension: AtomicUsize,
}

impl DemoEmbedder {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, dimension: usize) -> Self {
        Self {
            inner,
            dimension: AtomicUsize::new(dimension.max(1)),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EmbeddingProvider for DemoEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self.inner.embed(text).await {
            Ok(vector) => {
                if !vector.is_empty() {
                    self.dimension.store(vector.len(), Ordering::Relaxed);
                }
                Ok(vector)
            }
            Err(EmbeddingError::EmptyInput) => Err(EmbeddingError::EmptyInput),
            Err(e) => {
                warn!(
                    model = self.inner.model_name(),
                    error = %e,
                    "Demo mode: substituting placeholder embedding"
                );
                Ok(placeholder_vector(text, self.dimension()))
            }
        }
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}

/// Deterministic unit vector derived from SHA-256 blocks of the text.
/// The same text and dimension always map to the same vector.
pub fn placeholder_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector = Vec::with_capacity(dimension);
    let mut block: u32 = 0;

    while vector.len() < dimension {
        let digest = Sha256::new()
            .chain_update(text.as_bytes())
            .chain_update(block.to_le_bytes())
            .finalize();
        vector.extend(
            digest
                .iter()
                .take(dimension - vector.len())
                .map(|b| (*b as f32 / 127.5) - 1.0),
        );
        block += 1;
    }

    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

/// Builds the provider the ranker uses: remote, wrapped for demo mode if enabled.
pub fn build_embedder(config: &Config, client: OpenAiClient) -> Arc<dyn EmbeddingProvider> {
    let remote: Arc<dyn EmbeddingProvider> = Arc::new(RemoteEmbedder::new(
        client,
        config.embedding_model.clone(),
        config.embedding_max_chars,
    ));

    if config.demo_mode {
        warn!("DEMO_MODE is enabled: failed embeddings will be replaced by placeholder vectors");
        Arc::new(DemoEmbedder::new(
            remote,
            placeholder_dimension(&config.embedding_model),
        ))
    } else {
        remote
    }
}
