//! Resume scoring — prompt construction, the scorer backends, and strict
//! validation of the model's reply.
//!
//! `AppState` holds an `Arc<dyn ResumeScorer>`, chosen once at startup by
//! [`build_scorer`]: the mock backend when no credential is configured,
//! otherwise the LLM backend.

pub mod handlers;
pub mod llm;
pub mod mock;
pub mod prompts;
pub mod report;
pub mod validator;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{LlmClient, LlmError, LlmSettings};

pub use llm::LlmResumeScorer;
pub use mock::MockResumeScorer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFeedback {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
}

/// Canonical scoring result. `score` is always within 0–100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeScore {
    pub score: u8,
    pub feedback: ScoreFeedback,
}

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Error scoring resume: {0}")]
    Scoring(#[from] LlmError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),
}

/// A scoring backend. Implement this to swap backends without touching the
/// handlers.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<ResumeScore, ScoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Picks the scorer for the configured credential.
pub fn build_scorer(settings: &LlmSettings) -> Result<Arc<dyn ResumeScorer>, LlmError> {
    match settings.api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            let client = LlmClient::new(key.to_string(), settings.model.clone(), &settings.base_url)?;
            info!("LLM scorer initialized (model: {})", client.model());
            Ok(Arc::new(LlmResumeScorer::new(client)))
        }
        _ => {
            warn!("GROQ_API_KEY not set; resumes will receive a fixed mock score");
            Ok(Arc::new(MockResumeScorer))
        }
    }
}
