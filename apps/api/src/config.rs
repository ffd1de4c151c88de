use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; a missing `GROQ_API_KEY` switches scoring to the mock backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm: LlmSettings {
                api_key: optional_env("GROQ_API_KEY"),
                model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: optional_env("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
            port: parse_env("PORT", 8000)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 120)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating an empty or whitespace-only value as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
