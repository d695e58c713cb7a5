use std::sync::Arc;
use std::time::Duration;

use crate::llm_client::GenerationClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable generation backend. Default: `GeminiClient`.
    pub llm: Arc<dyn GenerationClient>,
    /// Upper bound on a single generation call.
    pub generation_timeout: Duration,
}
