use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ResumeScorer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Mock or LLM backend, chosen from the credential at startup.
    pub scorer: Arc<dyn ResumeScorer>,
}
