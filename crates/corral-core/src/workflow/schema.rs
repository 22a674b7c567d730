//! YAML schema types for workflow definitions.
//!
//! A workflow YAML pairs an ordered task list with the agents needed to run
//! it:
//!
//! ```yaml
//! tasks:
//!   - name: build
//!     command: "make all"
//!     agent: builder
//!   - name: announce
//!     command: "echo done"
//!
//! agents:
//!   - name: builder
//!     type: docker
//!     workflow: build.yaml
//!     volume: /srv/build-cache:/cache
//! ```
//!
//! A task naming an agent is dispatched to it over HTTP; a task without an
//! agent runs locally through the shell.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OrchestratorError;

/// Top-level workflow definition loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Ordered list of tasks.
    pub tasks: Vec<Task>,

    /// Agents the tasks may reference. Used only at spawn time.
    #[serde(default)]
    pub agents: Vec<AgentSpec>,
}

/// A unit of work: a local shell command, or a remote dispatch when an
/// agent is named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub name: String,

    #[serde(default)]
    pub command: Option<String>,

    /// Name of a declared agent to dispatch to. Absent means local execution.
    #[serde(default)]
    pub agent: Option<String>,
}

/// Declaration of an agent a workflow can spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,

    /// Runtime kind, e.g. "docker".
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,

    /// Workflow file assigned to the agent, passed through its environment.
    #[serde(default)]
    pub workflow: Option<String>,

    /// Volume mount in `host:container` form.
    #[serde(default)]
    pub volume: Option<String>,
}

fn default_kind() -> String {
    "docker".to_string()
}

impl Workflow {
    /// Parse a workflow definition from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, OrchestratorError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a workflow definition from a file path.
    pub fn from_file(path: &Path) -> Result<Self, OrchestratorError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| OrchestratorError::WorkflowFile {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_yaml(&content)
    }

    /// The built-in workflow used when no file is supplied: one local task.
    pub fn sample() -> Self {
        Self {
            tasks: vec![Task {
                name: "sample-task".to_string(),
                command: Some(r#"echo "Running sample task!""#.to_string()),
                agent: None,
            }],
            agents: vec![AgentSpec {
                name: "local-agent".to_string(),
                kind: "docker".to_string(),
                workflow: None,
                volume: None,
            }],
        }
    }

    /// Declaration for `name`, if the workflow carries one.
    pub fn agent_spec(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }
}
