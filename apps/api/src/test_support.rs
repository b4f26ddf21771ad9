//! In-memory fakes for the two remote seams: embeddings and text generation.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::llm_client::{ChatRequest, LlmError, TextGenerator};

/// Maps exact input texts to fixed vectors. Unknown or `failing` texts error.
#[derive(Default)]
pub struct StaticEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    failing: HashSet<String>,
    reject_empty: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn failing(mut self, text: &str) -> Self {
        self.failing.insert(text.to_string());
        self
    }

    pub fn rejecting_empty(mut self) -> Self {
        self.reject_empty = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.reject_empty && text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        if self.failing.contains(text) {
            return Err(EmbeddingError::Failure(LlmError::Api {
                status: 500,
                message: "simulated embedding outage".to_string(),
            }));
        }
        self.vectors.get(text).cloned().ok_or_else(|| {
            EmbeddingError::Failure(LlmError::Api {
                status: 404,
                message: format!("no vector registered for {text:?}"),
            })
        })
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.lookup(text);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn model_name(&self) -> &str {
        "static-test-embedder"
    }
}

enum Reply {
    Text(String),
    Fail,
    Hang,
}

/// Records every chat request and answers with a canned reply.
pub struct RecordingGenerator {
    reply: Reply,
    requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingGenerator {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Reply::Text(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(Reply::Fail)
    }

    /// Never answers; for cancellation tests.
    pub fn hanging() -> Self {
        Self::new(Reply::Hang)
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(LlmError::RateLimited { attempts: 3 }),
            Reply::Hang => std::future::pending().await,
        }
    }
}
