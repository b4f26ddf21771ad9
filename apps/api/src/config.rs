use std::str::FromStr;

use thiserror::Error;

use crate::llm_client::{DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable '{0}' is not set")]
    Missing(&'static str),

    #[error("Environment variable '{var}' is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the API key is missing or any value is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub summary_model: String,
    pub summary_temperature: f32,
    pub summary_max_tokens: u32,
    pub embedding_max_chars: usize,
    pub summary_resume_max_chars: usize,
    /// Upper bound on one summary call, retries included.
    pub summary_timeout_secs: u64,
    pub rank_concurrency: usize,
    pub default_top_k: usize,
    pub llm_max_retries: u32,
    /// Replace failed embeddings with placeholder vectors. Never enable in production.
    pub demo_mode: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            embedding_model: get("EMBEDDING_MODEL")
                .unwrap_or_else(|| "text-embedding-3-small".to_string()),
            summary_model: get("SUMMARY_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            summary_temperature: parse_or(&get, "SUMMARY_TEMPERATURE", 0.7)?,
            summary_max_tokens: positive(&get, "SUMMARY_MAX_TOKENS", 400)?,
            embedding_max_chars: positive(&get, "EMBEDDING_MAX_CHARS", 8000)?,
            summary_resume_max_chars: positive(&get, "SUMMARY_RESUME_MAX_CHARS", 1500)?,
            summary_timeout_secs: positive(&get, "SUMMARY_TIMEOUT_SECS", 60)?,
            rank_concurrency: positive(&get, "RANK_CONCURRENCY", 5)?,
            default_top_k: positive(&get, "DEFAULT_TOP_K", 10)?,
            llm_max_retries: positive(&get, "LLM_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            demo_mode: parse_bool(&get, "DEMO_MODE")?,
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value = parse_or(lookup, var, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            var,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(value)
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<bool, ConfigError> {
    match lookup(var).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                var,
                reason: format!("expected a boolean, got '{v}'"),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let err = load(&[("OPENAI_API_KEY", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.openai_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.summary_model, "gpt-3.5-turbo");
        assert_eq!(config.embedding_max_chars, 8000);
        assert_eq!(config.summary_resume_max_chars, 1500);
        assert_eq!(config.default_top_k, 10);
        assert_eq!(config.rank_concurrency, 5);
        assert_eq!(config.summary_timeout_secs, 60);
        assert!(!config.demo_mode);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("EMBEDDING_MODEL", "text-embedding-ada-002"),
            ("DEFAULT_TOP_K", "3"),
            ("DEMO_MODE", "true"),
            ("SUMMARY_TEMPERATURE", "0.2"),
        ])
        .unwrap();
        assert_eq!(config.embedding_model, "text-embedding-ada-002");
        assert_eq!(config.default_top_k, 3);
        assert!(config.demo_mode);
        assert!((config.summary_temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = load(&[("OPENAI_API_KEY", "sk-test"), ("RANK_CONCURRENCY", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "RANK_CONCURRENCY",
                ..
            }
        ));
    }

    #[test]
    fn test_unparsable_number_rejected() {
        let err = load(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }

    #[test]
    fn test_unparsable_bool_rejected() {
        let err = load(&[("OPENAI_API_KEY", "sk-test"), ("DEMO_MODE", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DEMO_MODE", .. }));
    }
}
