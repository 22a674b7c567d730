//! Workflow Runner — drives spawn → wait → dispatch for each task in order.
//!
//! Tasks run strictly sequentially; there is no parallel dispatch and no
//! dependency graph beyond declaration order. A task naming an undeclared
//! agent is skipped with an error log and the run continues; a readiness
//! timeout or a failed container run is terminal and aborts the remaining
//! tasks.

use std::path::Path;

use crate::config::Config;
use crate::error::OrchestratorError;
use crate::health::{HealthProbe, HttpHealthProbe, ReadinessWaiter};
use crate::registry::AgentRegistry;
use crate::spawner::{AgentSpawner, ContainerRuntime, DockerCli};
use crate::workflow::dispatcher::{TaskDispatcher, TaskOutcome};
use crate::workflow::schema::{AgentSpec, Task, Workflow};

/// Result of executing a single task.
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task_name: String,
    pub success: bool,
    /// Local execution outcome, when the task ran locally.
    pub outcome: Option<TaskOutcome>,
    /// Agent response body, when the task was dispatched remotely.
    pub response: Option<serde_json::Value>,
    /// Skip or failure reason.
    pub error: Option<String>,
}

/// Result of executing the entire workflow.
#[derive(Debug)]
pub struct WorkflowReport {
    pub tasks: Vec<TaskReport>,
    pub success: bool,
}

/// The sequential workflow engine.
pub struct WorkflowRunner<R, P> {
    spawner: AgentSpawner<R>,
    waiter: ReadinessWaiter,
    dispatcher: TaskDispatcher,
    probe: P,
}

impl WorkflowRunner<DockerCli, HttpHealthProbe> {
    /// Production runner: docker CLI spawning, HTTP health probes, and the
    /// 10-second poll interval with a 60-attempt budget.
    pub fn new(config: Config, registry: AgentRegistry) -> Self {
        let dispatcher = TaskDispatcher::new(config.task_workdir.clone());
        Self {
            spawner: AgentSpawner::new(config),
            waiter: ReadinessWaiter::new(registry),
            dispatcher,
            probe: HttpHealthProbe::new(),
        }
    }
}

impl<R: ContainerRuntime, P: HealthProbe> WorkflowRunner<R, P> {
    /// Runner with every collaborator injected.
    pub fn with_parts(
        spawner: AgentSpawner<R>,
        waiter: ReadinessWaiter,
        dispatcher: TaskDispatcher,
        probe: P,
    ) -> Self {
        Self {
            spawner,
            waiter,
            dispatcher,
            probe,
        }
    }

    /// Load and run a workflow file, or the built-in sample workflow when no
    /// file is given or the path does not exist.
    pub async fn run(
        &self,
        workflow_file: Option<&Path>,
    ) -> Result<WorkflowReport, OrchestratorError> {
        let workflow = match workflow_file {
            Some(path) if path.exists() => {
                let workflow = Workflow::from_file(path)?;
                tracing::info!("Loaded workflow from {}.", path.display());
                workflow
            }
            _ => {
                tracing::info!("Running default sample workflow.");
                Workflow::sample()
            }
        };
        self.run_workflow(&workflow).await
    }

    /// Execute each task of `workflow` in declaration order.
    pub async fn run_workflow(
        &self,
        workflow: &Workflow,
    ) -> Result<WorkflowReport, OrchestratorError> {
        let mut reports = Vec::with_capacity(workflow.tasks.len());

        for task in &workflow.tasks {
            let report = match &task.agent {
                Some(agent_name) => match workflow.agent_spec(agent_name) {
                    Some(spec) => self.run_remote(task, agent_name, spec).await?,
                    None => {
                        tracing::error!("Agent {} not found in workflow.", agent_name);
                        TaskReport {
                            task_name: task.name.clone(),
                            success: false,
                            outcome: None,
                            response: None,
                            error: Some(format!(
                                "agent '{}' not declared in workflow",
                                agent_name
                            )),
                        }
                    }
                },
                None => self.run_local(task).await,
            };
            reports.push(report);
        }

        let success = reports.iter().all(|r| r.success);
        Ok(WorkflowReport {
            tasks: reports,
            success,
        })
    }

    /// Spawn the agent (idempotent), block on readiness, dispatch remotely.
    async fn run_remote(
        &self,
        task: &Task,
        agent_name: &str,
        spec: &AgentSpec,
    ) -> Result<TaskReport, OrchestratorError> {
        self.spawner.spawn(spec).await?;
        let agent_url = self.waiter.wait(&self.probe, agent_name).await?;
        let response = self.dispatcher.dispatch_remote(task, &agent_url).await;

        Ok(TaskReport {
            task_name: task.name.clone(),
            success: response.is_some(),
            outcome: None,
            error: response
                .is_none()
                .then(|| format!("no result from agent '{}'", agent_name)),
            response,
        })
    }

    async fn run_local(&self, task: &Task) -> TaskReport {
        let outcome = self.dispatcher.execute_local(task).await;
        TaskReport {
            task_name: task.name.clone(),
            success: outcome.is_success(),
            error: match &outcome {
                TaskOutcome::Error { message, .. } => Some(message.clone()),
                TaskOutcome::Success { .. } => None,
            },
            outcome: Some(outcome),
            response: None,
        }
    }
}
