//! Corral Server — the agent manager API.
//!
//! A thin axum adapter over corral-core: spawned agents announce themselves
//! here, and the workflow runner reads the resulting registry while waiting
//! for readiness.

pub mod api;

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use corral_core::error::OrchestratorError;
use corral_core::state::AppState;

/// Configuration for the manager API server.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
        }
    }
}

/// Start the manager API server.
///
/// Binds, then serves on a background task and returns the actual address —
/// the caller typically goes on to drive a workflow against the same state.
pub async fn start_server(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, OrchestratorError> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::api_router())
        .route("/api/health", axum::routing::get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| OrchestratorError::BadRequest(format!("Invalid address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| OrchestratorError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| OrchestratorError::Internal(format!("Failed to get local address: {}", e)))?;

    tracing::info!("Manager API listening on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "corral-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
