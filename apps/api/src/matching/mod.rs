// Candidate matching: embedding-based ranking plus on-demand fit summaries.
// Remote calls go through llm_client only, via the EmbeddingProvider and
// TextGenerator seams.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod ranker;
pub mod similarity;
pub mod summarizer;
