//! Fit Summarizer: asks the chat model why one candidate fits one job.
//!
//! Never fails: when the model is unreachable or answers with nothing, the
//! caller still gets a displayable sentence, flagged `degraded: true`.
//! Output is sampled, so identical inputs may produce different text.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::Config;
use crate::llm_client::{truncate_chars, ChatMessage, ChatRequest, TextGenerator};
use crate::matching::models::{candidate_display_name, FitSummary};
use crate::matching::prompts::build_fit_summary_prompt;

#[derive(Debug, Clone)]
pub struct SummarySettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Resume characters kept in the prompt.
    pub max_resume_chars: usize,
}

impl From<&Config> for SummarySettings {
    fn from(config: &Config) -> Self {
        Self {
            model: config.summary_model.clone(),
            temperature: config.summary_temperature,
            max_tokens: config.summary_max_tokens,
            max_resume_chars: config.summary_resume_max_chars,
        }
    }
}

pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    settings: SummarySettings,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: SummarySettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    /// The exact chat request sent for a (job, resume) pair.
    pub fn build_request(&self, job_text: &str, resume_text: &str) -> ChatRequest {
        let excerpt = truncate_chars(resume_text, self.settings.max_resume_chars);
        ChatRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::user(build_fit_summary_prompt(
                job_text, excerpt,
            ))],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        }
    }

    /// Generates a fit summary. `candidate` (usually the document id) is only
    /// used to personalise the fallback sentence.
    pub async fn summarize(
        &self,
        job_text: &str,
        resume_text: &str,
        candidate: Option<&str>,
    ) -> FitSummary {
        let request = self.build_request(job_text, resume_text);

        match self.generator.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => FitSummary {
                text: text.trim().to_string(),
                degraded: false,
            },
            Ok(_) => {
                warn!("Summary model returned empty text; using fallback");
                fallback_summary(candidate)
            }
            Err(e) => {
                warn!(error = %e, "Summary generation failed; using fallback");
                fallback_summary(candidate)
            }
        }
    }

    /// Like `summarize`, but gives up as soon as `cancel` resolves.
    /// The in-flight request is dropped and `None` is returned.
    pub async fn summarize_until<C>(
        &self,
        job_text: &str,
        resume_text: &str,
        candidate: Option<&str>,
        cancel: C,
    ) -> Option<FitSummary>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!("Summary request cancelled by caller");
                None
            }
            summary = self.summarize(job_text, resume_text, candidate) => Some(summary),
        }
    }
}

/// Generic positive sentence used when the model is unavailable.
pub fn fallback_summary(candidate: Option<&str>) -> FitSummary {
    let name = candidate
        .map(candidate_display_name)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "This candidate".to_string());

    FitSummary {
        text: format!(
            "{name} brings relevant experience and skills that align with the key \
             requirements of this role."
        ),
        degraded: true,
    }
}
