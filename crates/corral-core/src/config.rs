//! Environment-driven configuration.
//!
//! Every knob comes from an environment variable with the defaults the agent
//! image and compose files assume. Malformed values fall back to the default
//! with a warning rather than aborting startup.

#[derive(Debug, Clone)]
pub struct Config {
    /// Port each spawned agent serves its task API on (`AGENT_API_PORT`).
    pub agent_api_port: u16,
    /// Port the manager API listens on (`AGENT_MANAGER_API_PORT`).
    pub manager_api_port: u16,
    /// Container network agents are attached to (`DEFAULT_NETWORK`).
    pub network: String,
    /// Directory workflow files are resolved against (`WORKFLOW_DIR`).
    pub workflow_dir: String,
    /// Image used for spawned agents (`AGENT_IMAGE`). Supports `${VAR}`
    /// references, expanded at spawn time.
    pub agent_image: String,
    /// Working directory for local task execution (`TASK_WORKDIR`).
    pub task_workdir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_api_port: 5000,
            manager_api_port: 5001,
            network: "bridge".to_string(),
            workflow_dir: "/app/workflows".to_string(),
            agent_image: "your-agent-image:latest".to_string(),
            task_workdir: "/app".to_string(),
        }
    }
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            agent_api_port: env_port("AGENT_API_PORT", defaults.agent_api_port),
            manager_api_port: env_port("AGENT_MANAGER_API_PORT", defaults.manager_api_port),
            network: env_or("DEFAULT_NETWORK", &defaults.network),
            workflow_dir: env_or("WORKFLOW_DIR", &defaults.workflow_dir),
            agent_image: env_or("AGENT_IMAGE", &defaults.agent_image),
            task_workdir: env_or("TASK_WORKDIR", &defaults.task_workdir),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_port(key: &str, default: u16) -> u16 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring non-numeric {}='{}', using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
