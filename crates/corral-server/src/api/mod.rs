pub mod agents;

use axum::Router;

use corral_core::state::AppState;

/// Build the complete API router with all sub-routes.
pub fn api_router() -> Router<AppState> {
    Router::new().nest("/api/agents", agents::router())
}
