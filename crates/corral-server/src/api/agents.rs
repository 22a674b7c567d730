//! Agent registration endpoints.
//!
//! A spawned agent calls `POST /register` once its task endpoint is up; the
//! readiness waiter then finds it through the shared registry. Registrations
//! can be removed explicitly, so long-lived managers don't accumulate dead
//! entries.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use corral_core::error::OrchestratorError;
use corral_core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_agents))
        .route("/register", post(register_agent))
        .route("/{name}", delete(deregister_agent))
}

async fn list_agents(State(state): State<AppState>) -> Json<serde_json::Value> {
    let agents = state.registry.list().await;
    Json(serde_json::json!({ "agents": agents }))
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    url: String,
}

async fn register_agent(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, OrchestratorError> {
    if body.name.trim().is_empty() || body.url.trim().is_empty() {
        return Err(OrchestratorError::BadRequest(
            "Both 'name' and 'url' are required".to_string(),
        ));
    }

    let agent = state.registry.register(&body.name, &body.url).await;
    Ok(Json(serde_json::json!({ "agent": agent })))
}

async fn deregister_agent(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, OrchestratorError> {
    if state.registry.remove(&name).await {
        Ok(Json(serde_json::json!({ "deleted": true })))
    } else {
        Err(OrchestratorError::NotFound(format!(
            "Agent {} not registered",
            name
        )))
    }
}
