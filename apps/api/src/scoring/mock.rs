use async_trait::async_trait;
use tracing::debug;

use super::{ResumeScore, ResumeScorer, ScoreError, ScoreFeedback};

pub const MOCK_SCORE: u8 = 75;

/// Deterministic, network-free scorer used when no credential is configured.
/// Returns the same result for every input, including empty text.
pub struct MockResumeScorer;

impl MockResumeScorer {
    pub fn fixed_result() -> ResumeScore {
        ResumeScore {
            score: MOCK_SCORE,
            feedback: ScoreFeedback {
                strengths: vec![
                    "Strong education section".to_string(),
                    "Good experience details".to_string(),
                ],
                weaknesses: vec![
                    "Missing quantifiable achievements".to_string(),
                    "Too verbose".to_string(),
                ],
                improvements: vec![
                    "Add metrics to achievements".to_string(),
                    "Be more concise".to_string(),
                    "Consider adding skills section".to_string(),
                ],
            },
        }
    }
}

#[async_trait]
impl ResumeScorer for MockResumeScorer {
    async fn score(&self, text: &str) -> Result<ResumeScore, ScoreError> {
        debug!(chars = text.chars().count(), "Returning mock score");
        Ok(Self::fixed_result())
    }

    fn backend(&self) -> &'static str {
        "mock"
    }
}
