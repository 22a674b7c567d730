//! Shared application state for the manager API and the workflow runner.

use std::sync::Arc;

use crate::config::Config;
use crate::registry::AgentRegistry;

/// Shared state accessible by all API handlers and the runner.
pub struct AppStateInner {
    pub config: Config,
    pub registry: AgentRegistry,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    pub fn new(config: Config) -> Self {
        Self {
            registry: AgentRegistry::new(),
            config,
        }
    }
}
