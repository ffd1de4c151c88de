//! Axum route handlers for the Scoring API.

use std::time::Duration;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::{extract_document, RawDocument};
use crate::scoring::report::render_report;
use crate::scoring::ResumeScore;
use crate::state::AppState;

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// POST /score-resume/
pub async fn handle_score_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeScore>, AppError> {
    let document = read_upload(multipart).await?;
    let result = score_document(&state, document).await?;
    Ok(Json(result))
}

/// POST /score-resume/report
///
/// Same pipeline as `handle_score_resume`, rendered as Markdown.
pub async fn handle_score_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let document = read_upload(multipart).await?;
    let result = score_document(&state, document).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        render_report(&result),
    ))
}

/// Pulls the first `file` part out of the form. Other parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<RawDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let declared_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        return Ok(RawDocument {
            bytes,
            declared_name,
        });
    }
    Err(AppError::Validation(format!("Missing '{FILE_FIELD}' upload")))
}

/// Body-limit overruns surface from inside the multipart stream.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", err.body_text()))
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}

/// Extract → score → validate, for one document.
///
/// The scorer call is the only unbounded wait in the pipeline, so the deadline
/// is applied here rather than inside the scorer.
async fn score_document(state: &AppState, document: RawDocument) -> Result<ResumeScore, AppError> {
    let span = info_span!(
        "score_resume",
        request_id = %Uuid::new_v4(),
        file = %document.declared_name,
        backend = state.scorer.backend(),
    );

    async move {
        let text = extract_document(document).await?;

        let timeout_secs = state.config.request_timeout_secs;
        let result = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            state.scorer.score(&text.content),
        )
        .await
        .map_err(|_| AppError::Timeout(timeout_secs))??;

        info!(score = result.score, "Resume scored");
        Ok::<_, AppError>(result)
    }
    .instrument(span)
    .await
}
