//! Agent health probing and readiness waiting.
//!
//! An agent counts as ready once it is both registered with the manager and
//! answering its health endpoint. The waiter polls at a fixed interval with
//! a bounded attempt budget; there is no backoff and no cancellation, a wait
//! runs until success or budget exhaustion.

use std::future::Future;
use std::time::Duration;

use crate::error::OrchestratorError;
use crate::registry::AgentRegistry;

/// Timeout for a single health probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// How an agent's health endpoint is checked. Implemented over HTTP in
/// production; tests substitute a recording fake.
pub trait HealthProbe {
    fn is_healthy(&self, base_url: &str) -> impl Future<Output = bool> + Send;
}

/// Probes `GET {url}/health`; healthy means a non-error HTTP status.
pub struct HttpHealthProbe {
    client: reqwest::Client,
}

impl HttpHealthProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(PROBE_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for HttpHealthProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthProbe for HttpHealthProbe {
    async fn is_healthy(&self, base_url: &str) -> bool {
        let url = format!("{}/health", base_url.trim_end_matches('/'));
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            // Transport failure and an explicit unhealthy response look the
            // same to the waiter.
            Err(_) => false,
        }
    }
}

/// Polls the registry and the health probe until an agent is ready.
///
/// The interval and attempt budget are injected so tests can run with
/// millisecond schedules; production uses 10 seconds × 60 attempts.
pub struct ReadinessWaiter {
    registry: AgentRegistry,
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessWaiter {
    pub fn new(registry: AgentRegistry) -> Self {
        Self::with_schedule(registry, Duration::from_secs(10), 60)
    }

    pub fn with_schedule(registry: AgentRegistry, interval: Duration, max_attempts: u32) -> Self {
        Self {
            registry,
            interval,
            max_attempts,
        }
    }

    /// Block until `agent_name` is registered and passes a health probe,
    /// returning its base URL. Exactly one probe is issued per attempt where
    /// the agent is registered; unregistered attempts only sleep.
    pub async fn wait<P: HealthProbe>(
        &self,
        probe: &P,
        agent_name: &str,
    ) -> Result<String, OrchestratorError> {
        for attempt in 1..=self.max_attempts {
            if let Some(url) = self.registry.url_of(agent_name).await {
                if probe.is_healthy(&url).await {
                    tracing::info!(
                        "Agent '{}' ready at {} (attempt {})",
                        agent_name,
                        url,
                        attempt
                    );
                    return Ok(url);
                }
                tracing::debug!(
                    "Agent '{}' registered but not healthy (attempt {}/{})",
                    agent_name,
                    attempt,
                    self.max_attempts
                );
            } else {
                tracing::debug!(
                    "Agent '{}' not yet registered (attempt {}/{})",
                    agent_name,
                    attempt,
                    self.max_attempts
                );
            }
            tokio::time::sleep(self.interval).await;
        }

        Err(OrchestratorError::AgentTimeout {
            agent: agent_name.to_string(),
            attempts: self.max_attempts,
        })
    }
}
