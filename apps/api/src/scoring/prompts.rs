// Scoring prompt templates.

/// System prompt for resume review.
pub const RESUME_REVIEW_SYSTEM: &str =
    "You are an expert resume reviewer with years of HR and recruiting experience.";

/// Review instructions. The resume text is appended verbatim after this.
pub const RESUME_REVIEW_PROMPT: &str = r#"I have a resume that I'd like you to evaluate. Please analyze it carefully and provide:

1. A numerical score from 0-100 reflecting the overall quality
2. Key strengths (at least 3)
3. Areas for improvement (at least 3)
4. Specific, actionable suggestions for making this resume more effective (at least 3)

Focus on factors like: clarity, quantifiable achievements, relevance, formatting consistency, use of action verbs,
and overall impact. Please format your response as a JSON object with the following structure:
{
    "score": (numerical score),
    "feedback": {
        "strengths": [(list of strengths)],
        "weaknesses": [(list of weaknesses)],
        "improvements": [(list of specific suggestions)]
    }
}

Here's the resume text:
"#;

/// Builds the user prompt for `resume_text`. The text is not escaped.
pub fn build_prompt(resume_text: &str) -> String {
    let mut prompt = String::with_capacity(RESUME_REVIEW_PROMPT.len() + resume_text.len());
    prompt.push_str(RESUME_REVIEW_PROMPT);
    prompt.push_str(resume_text);
    prompt
}
