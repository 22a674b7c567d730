//! Task dispatch — remote HTTP POST to an agent, or local shell execution.
//!
//! Remote transport errors are logged and yield an absent result; they never
//! abort the surrounding workflow. Local failures come back as a structured
//! error outcome carrying the captured stderr.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::workflow::schema::Task;

/// Timeout for a remote task dispatch.
const DISPATCH_TIMEOUT: Duration = Duration::from_secs(600);

/// Structured result of executing a task locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskOutcome {
    Success {
        output: String,
        returncode: i32,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        returncode: Option<i32>,
    },
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }
}

/// Sends tasks to agents and runs local commands.
pub struct TaskDispatcher {
    client: reqwest::Client,
    /// Working directory for local command execution.
    workdir: String,
}

impl TaskDispatcher {
    pub fn new(workdir: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(DISPATCH_TIMEOUT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            workdir: workdir.into(),
        }
    }

    /// POST the task to `{agent_url}/task` and return the parsed JSON body.
    /// Any transport or HTTP error is logged and yields `None`.
    pub async fn dispatch_remote(
        &self,
        task: &Task,
        agent_url: &str,
    ) -> Option<serde_json::Value> {
        let url = format!("{}/task", agent_url.trim_end_matches('/'));
        tracing::info!("Dispatching task '{}' to {}", task.name, url);

        let response = match self.client.post(&url).json(task).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error communicating with agent: {}", e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Agent returned an error status: {}", e);
                return None;
            }
        };

        match response.json().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::error!("Failed to parse agent response: {}", e);
                None
            }
        }
    }

    /// Run the task's command through `sh -c` in the configured workdir.
    ///
    /// A task with no command yields an explicit error outcome instead of
    /// failing the run.
    pub async fn execute_local(&self, task: &Task) -> TaskOutcome {
        let Some(command) = &task.command else {
            return TaskOutcome::Error {
                message: "No command provided".to_string(),
                returncode: None,
            };
        };
        let command = resolve_env_vars(command);

        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(&command)
            .current_dir(&self.workdir)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout).to_string();
                tracing::info!("Task '{}' output: {}", task.name, stdout.trim_end());
                TaskOutcome::Success {
                    output: stdout,
                    returncode: 0,
                }
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                tracing::error!("Task '{}' error: {}", task.name, stderr.trim_end());
                TaskOutcome::Error {
                    message: stderr,
                    returncode: Some(output.status.code().unwrap_or(-1)),
                }
            }
            Err(e) => {
                tracing::error!("Task '{}' failed to start: {}", task.name, e);
                TaskOutcome::Error {
                    message: e.to_string(),
                    returncode: None,
                }
            }
        }
    }
}

/// Resolve environment variable references in a string.
/// Supports `${ENV_VAR}` and `${ENV_VAR:-default}` syntax.
pub fn resolve_env_vars(input: &str) -> String {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var_expr = &caps[1];
        // Support default value syntax: ${VAR:-default}
        if let Some(idx) = var_expr.find(":-") {
            let var_name = &var_expr[..idx];
            let default_val = &var_expr[idx + 2..];
            std::env::var(var_name).unwrap_or_else(|_| default_val.to_string())
        } else {
            std::env::var(var_expr).unwrap_or_else(|_| format!("${{{}}}", var_expr))
        }
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, command: Option<&str>) -> Task {
        Task {
            name: name.to_string(),
            command: command.map(|c| c.to_string()),
            agent: None,
        }
    }

    #[tokio::test]
    async fn test_local_command_success() {
        let dispatcher = TaskDispatcher::new(".");
        let outcome = dispatcher.execute_local(&task("greet", Some("echo hello"))).await;

        assert_eq!(
            outcome,
            TaskOutcome::Success {
                output: "hello\n".to_string(),
                returncode: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_local_failure_captures_stderr_and_code() {
        let dispatcher = TaskDispatcher::new(".");
        let outcome = dispatcher
            .execute_local(&task("explode", Some("echo boom >&2; exit 3")))
            .await;

        assert_eq!(
            outcome,
            TaskOutcome::Error {
                message: "boom\n".to_string(),
                returncode: Some(3),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_command_is_an_error_outcome() {
        let dispatcher = TaskDispatcher::new(".");
        let outcome = dispatcher.execute_local(&task("empty", None)).await;

        assert_eq!(
            outcome,
            TaskOutcome::Error {
                message: "No command provided".to_string(),
                returncode: None,
            }
        );
    }

    #[tokio::test]
    async fn test_command_env_expansion_with_default() {
        let dispatcher = TaskDispatcher::new(".");
        let outcome = dispatcher
            .execute_local(&task("greet", Some("echo ${CORRAL_TEST_UNSET_GREETING:-hi}")))
            .await;

        assert_eq!(
            outcome,
            TaskOutcome::Success {
                output: "hi\n".to_string(),
                returncode: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_remote_dispatch_error_returns_none() {
        let dispatcher = TaskDispatcher::new(".");
        // Nothing listens on port 1; the connection error must not propagate.
        let result = dispatcher
            .dispatch_remote(&task("build", Some("make")), "http://127.0.0.1:1")
            .await;
        assert!(result.is_none());
    }

    #[test]
    fn test_resolve_env_vars() {
        std::env::set_var("CORRAL_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${CORRAL_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix-${CORRAL_TEST_VAR}-suffix"),
            "prefix-hello-suffix"
        );
        assert_eq!(
            resolve_env_vars("${CORRAL_TEST_NONEXISTENT:-fallback}"),
            "fallback"
        );
        assert_eq!(
            resolve_env_vars("${CORRAL_TEST_NONEXISTENT}"),
            "${CORRAL_TEST_NONEXISTENT}"
        );
        std::env::remove_var("CORRAL_TEST_VAR");
    }

    #[test]
    fn test_outcome_serialization_shape() {
        let success = TaskOutcome::Success {
            output: "ok\n".to_string(),
            returncode: 0,
        };
        let json = serde_json::to_value(&success).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["output"], "ok\n");
        assert_eq!(json["returncode"], 0);

        let error = TaskOutcome::Error {
            message: "nope".to_string(),
            returncode: None,
        };
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "nope");
        assert!(json.get("returncode").is_none());
    }
}
