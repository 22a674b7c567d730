//! Agent spawning via the container runtime CLI.
//!
//! The running-container listing is consulted first so spawning an agent
//! that is already up is a no-op. A failure of the listing check itself only
//! logs and the run is still attempted; a failed `run` is fatal to the
//! workflow.

use std::future::Future;

use tokio::process::Command;

use crate::config::Config;
use crate::error::OrchestratorError;
use crate::workflow::dispatcher::resolve_env_vars;
use crate::workflow::schema::AgentSpec;

/// Everything needed for a detached container run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub name: String,
    pub image: String,
    pub network: String,
    pub port: u16,
    pub env: Vec<(String, String)>,
    pub volume: Option<String>,
}

/// Container runtime operations the spawner needs. `DockerCli` shells out;
/// tests substitute a recording fake.
pub trait ContainerRuntime {
    /// Raw listing output for running containers matching `name_filter`.
    fn list_running(
        &self,
        name_filter: &str,
    ) -> impl Future<Output = Result<String, OrchestratorError>> + Send;

    /// Start a detached container.
    fn run_detached(
        &self,
        request: &RunRequest,
    ) -> impl Future<Output = Result<(), OrchestratorError>> + Send;
}

/// Invokes the `docker` CLI.
pub struct DockerCli;

impl ContainerRuntime for DockerCli {
    async fn list_running(&self, name_filter: &str) -> Result<String, OrchestratorError> {
        let output = Command::new("docker")
            .args(["ps", "--filter", &format!("name={}", name_filter)])
            .output()
            .await
            .map_err(|e| OrchestratorError::Spawn(format!("failed to invoke docker ps: {}", e)))?;

        if !output.status.success() {
            return Err(OrchestratorError::Spawn(format!(
                "docker ps exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn run_detached(&self, request: &RunRequest) -> Result<(), OrchestratorError> {
        let port = request.port.to_string();
        let mut cmd = Command::new("docker");
        cmd.args(["run", "-d", "--name", &request.name])
            .args(["--network", &request.network])
            .args(["-p", &format!("{}:{}", port, port)]);
        for (key, value) in &request.env {
            cmd.args(["-e", &format!("{}={}", key, value)]);
        }
        if let Some(volume) = &request.volume {
            cmd.args(["-v", volume]);
        }
        cmd.arg(&request.image);

        let output = cmd
            .output()
            .await
            .map_err(|e| OrchestratorError::Spawn(format!("failed to invoke docker run: {}", e)))?;

        if !output.status.success() {
            return Err(OrchestratorError::Spawn(format!(
                "docker run for '{}' exited with {}: {}",
                request.name,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!("Spawned agent container '{}'", request.name);
        Ok(())
    }
}

/// Spawns agents declared in a workflow, skipping ones already running.
pub struct AgentSpawner<R> {
    runtime: R,
    config: Config,
}

impl AgentSpawner<DockerCli> {
    pub fn new(config: Config) -> Self {
        Self::with_runtime(DockerCli, config)
    }
}

impl<R: ContainerRuntime> AgentSpawner<R> {
    pub fn with_runtime(runtime: R, config: Config) -> Self {
        Self { runtime, config }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Start the container for `spec` unless one with the same name is
    /// already running (substring match on the listing output).
    pub async fn spawn(&self, spec: &AgentSpec) -> Result<(), OrchestratorError> {
        match self.runtime.list_running(&spec.name).await {
            Ok(listing) if listing.contains(&spec.name) => {
                tracing::info!("Agent {} is already running.", spec.name);
                return Ok(());
            }
            Ok(_) => {}
            // The listing check failing is not fatal; attempt the run anyway.
            Err(e) => tracing::error!("Error checking container runtime: {}", e),
        }

        let mut env = vec![
            (
                "AGENT_API_PORT".to_string(),
                self.config.agent_api_port.to_string(),
            ),
            (
                "AGENT_MANAGER_API_PORT".to_string(),
                self.config.manager_api_port.to_string(),
            ),
            ("AGENT_NAME".to_string(), spec.name.clone()),
        ];
        if let Some(workflow) = &spec.workflow {
            env.push(("AGENT_WORKFLOW".to_string(), workflow.clone()));
        }

        let request = RunRequest {
            name: spec.name.clone(),
            image: resolve_env_vars(&self.config.agent_image),
            network: self.config.network.clone(),
            port: self.config.agent_api_port,
            env,
            volume: spec.volume.clone(),
        };

        tracing::info!(
            "Spawning agent '{}' ({}) from image {}",
            spec.name,
            spec.kind,
            request.image
        );
        self.runtime.run_detached(&request).await
    }
}
