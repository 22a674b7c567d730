//! Corral Core — transport-agnostic domain logic for the corral orchestrator.
//!
//! This crate contains the workflow model, the agent registry, container
//! spawning, health probing, and task dispatch. It has **no HTTP framework
//! dependency** by default, making it suitable for use in:
//!
//! - HTTP servers (via `corral-server`)
//! - CLI tools
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `OrchestratorError` for use in
//!   axum handlers.

pub mod config;
pub mod error;
pub mod health;
pub mod registry;
pub mod spawner;
pub mod state;
pub mod workflow;

// Convenience re-exports
pub use config::Config;
pub use error::OrchestratorError;
pub use registry::AgentRegistry;
pub use state::{AppState, AppStateInner};
