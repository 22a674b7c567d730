//! Registered-agent state shared between the manager API and the runner.
//!
//! The registry is an explicit handle injected into every consumer rather
//! than a process-global map. The guarded map makes concurrent registrations
//! well-defined: last write wins.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// A single agent registration: name → base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAgent {
    pub name: String,
    /// Base URL the agent serves `/health` and `/task` on.
    pub url: String,
    pub registered_at: DateTime<Utc>,
}

/// Cloneable handle to the shared agent registry.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    inner: Arc<RwLock<HashMap<String, RegisteredAgent>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an agent under `name`. Re-registration replaces the URL.
    pub async fn register(&self, name: &str, url: &str) -> RegisteredAgent {
        let record = RegisteredAgent {
            name: name.to_string(),
            url: url.to_string(),
            registered_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .insert(name.to_string(), record.clone());
        tracing::info!("Registered agent '{}' at {}", name, url);
        record
    }

    /// Base URL of a registered agent, if any.
    pub async fn url_of(&self, name: &str) -> Option<String> {
        self.inner.read().await.get(name).map(|a| a.url.clone())
    }

    /// All registrations, sorted by name.
    pub async fn list(&self) -> Vec<RegisteredAgent> {
        let mut agents: Vec<_> = self.inner.read().await.values().cloned().collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    /// Remove a registration. Returns whether it existed.
    pub async fn remove(&self, name: &str) -> bool {
        self.inner.write().await.remove(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_lookup() {
        let registry = AgentRegistry::new();
        assert!(registry.url_of("builder").await.is_none());

        registry.register("builder", "http://builder:5000").await;
        assert_eq!(
            registry.url_of("builder").await.as_deref(),
            Some("http://builder:5000")
        );
        assert_eq!(registry.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_reregistration_replaces_url() {
        let registry = AgentRegistry::new();
        registry.register("builder", "http://old:5000").await;
        registry.register("builder", "http://new:5000").await;

        assert_eq!(
            registry.url_of("builder").await.as_deref(),
            Some("http://new:5000")
        );
        assert_eq!(registry.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = AgentRegistry::new();
        registry.register("builder", "http://builder:5000").await;

        assert!(registry.remove("builder").await);
        assert!(!registry.remove("builder").await);
        assert!(registry.url_of("builder").await.is_none());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let registry = AgentRegistry::new();
        registry.register("zeta", "http://zeta:5000").await;
        registry.register("alpha", "http://alpha:5000").await;

        let names: Vec<_> = registry.list().await.into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
