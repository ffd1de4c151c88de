use async_trait::async_trait;
use tracing::{debug, warn};

use super::prompts::{build_prompt, RESUME_REVIEW_SYSTEM};
use super::validator::validate;
use super::{ResumeScore, ResumeScorer, ScoreError};
use crate::llm_client::LlmClient;

/// Scores resumes with a single chat-completion call. The reply is never
/// trusted: it goes through [`validate`] before reaching the caller.
pub struct LlmResumeScorer {
    llm: LlmClient,
}

impl LlmResumeScorer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeScorer for LlmResumeScorer {
    async fn score(&self, text: &str) -> Result<ResumeScore, ScoreError> {
        let prompt = build_prompt(text);
        let raw = self.llm.call_json_text(&prompt, RESUME_REVIEW_SYSTEM).await?;
        debug!(reply_len = raw.len(), "Model reply received");

        validate(&raw).inspect_err(|e| warn!("Rejected model reply: {e}"))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}
