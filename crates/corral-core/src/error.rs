//! Core error type for the corral orchestrator.
//!
//! `OrchestratorError` is used throughout the core domain (registry, spawner,
//! workflow runner). When the `axum` feature is enabled, it also implements
//! `IntoResponse` so it can be used directly as an axum handler error type.

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to read workflow file '{path}': {source}")]
    WorkflowFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse workflow YAML: {0}")]
    WorkflowParse(#[from] serde_yaml::Error),

    #[error("Container runtime error: {0}")]
    Spawn(String),

    #[error("Agent {agent} did not become ready within {attempts} attempts")]
    AgentTimeout { agent: String, attempts: u32 },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// axum integration (opt-in via feature flag)
// ---------------------------------------------------------------------------

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for OrchestratorError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            OrchestratorError::NotFound(_) => StatusCode::NOT_FOUND,
            OrchestratorError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
