use std::sync::Arc;

use crate::config::Config;
use crate::matching::ranker::Ranker;
use crate::matching::summarizer::Summarizer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only stateless services; nothing here changes between requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ranker: Arc<Ranker>,
    pub summarizer: Arc<Summarizer>,
}
