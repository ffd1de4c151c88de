//! Strict schema check for the model's reply.
//!
//! The provider gives no shape guarantee, so the reply is walked as a
//! `serde_json::Value` and every key is type-checked explicitly. The first
//! missing or mistyped key is named in the error.
//!
//! Item counts are not enforced: the prompt asks for at least three of each,
//! but empty lists are accepted.

use serde_json::{Map, Value};

use super::{ResumeScore, ScoreError, ScoreFeedback};

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

pub fn validate(raw_json: &str) -> Result<ResumeScore, ScoreError> {
    let value: Value = serde_json::from_str(raw_json)
        .map_err(|e| malformed(format!("reply is not valid JSON: {e}")))?;
    let root = value
        .as_object()
        .ok_or_else(|| malformed(format!("expected a JSON object, got {}", kind(&value))))?;

    let score = read_score(root)?;

    let feedback = root
        .get("feedback")
        .ok_or_else(|| missing("feedback"))?;
    let feedback = feedback
        .as_object()
        .ok_or_else(|| mistyped("feedback", "an object", feedback))?;

    Ok(ResumeScore {
        score,
        feedback: ScoreFeedback {
            strengths: read_strings(feedback, "strengths")?,
            weaknesses: read_strings(feedback, "weaknesses")?,
            improvements: read_strings(feedback, "improvements")?,
        },
    })
}

fn read_score(root: &Map<String, Value>) -> Result<u8, ScoreError> {
    let raw = root.get("score").ok_or_else(|| missing("score"))?;

    let score = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        _ => None,
    }
    .ok_or_else(|| mistyped("score", "an integer", raw))?;

    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(malformed(format!(
            "key `score` is {score}, outside {MIN_SCORE}-{MAX_SCORE}"
        )));
    }
    // Range checked above.
    Ok(score as u8)
}

fn read_strings(feedback: &Map<String, Value>, key: &str) -> Result<Vec<String>, ScoreError> {
    let path = format!("feedback.{key}");
    let raw = feedback.get(key).ok_or_else(|| missing(&path))?;
    let items = raw
        .as_array()
        .ok_or_else(|| mistyped(&path, "an array of strings", raw))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(String::from)
                .ok_or_else(|| mistyped(&format!("{path}[{i}]"), "a string", item))
        })
        .collect()
}

fn malformed(message: String) -> ScoreError {
    ScoreError::MalformedResponse(message)
}

fn missing(path: &str) -> ScoreError {
    malformed(format!("missing key `{path}`"))
}

fn mistyped(path: &str, expected: &str, found: &Value) -> ScoreError {
    malformed(format!(
        "key `{path}` must be {expected}, got {}",
        kind(found)
    ))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
