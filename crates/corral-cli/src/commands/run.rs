//! `corral run` — execute a workflow with the manager API embedded.
//!
//! The manager API is served in the background for the duration of the run
//! so agents spawned mid-workflow can register themselves and pass the
//! readiness wait.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use corral_core::config::Config;
use corral_core::state::{AppState, AppStateInner};
use corral_core::workflow::executor::{WorkflowReport, WorkflowRunner};
use corral_server::{start_server, ServerConfig};

/// Run a workflow file, or the built-in sample workflow when `file` is None.
pub async fn run(file: Option<&str>, manager_port: Option<u16>) -> Result<(), String> {
    // Load .env / .env.local if present (for image names, ports, etc.)
    load_dotenv();

    let config = Config::from_env();
    let port = manager_port.unwrap_or(config.manager_api_port);
    let state: AppState = Arc::new(AppStateInner::new(config.clone()));

    let addr = start_server(
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port,
        },
        state.clone(),
    )
    .await
    .map_err(|e| e.to_string())?;
    println!("Manager API listening on http://{}", addr);

    let workflow_path = file.map(|f| resolve_workflow_path(f, &config.workflow_dir));
    let runner = WorkflowRunner::new(config, state.registry.clone());
    let report = runner
        .run(workflow_path.as_deref())
        .await
        .map_err(|e| e.to_string())?;

    print_report(&report);

    if report.success {
        Ok(())
    } else {
        let failed: Vec<_> = report
            .tasks
            .iter()
            .filter(|t| !t.success)
            .map(|t| t.task_name.clone())
            .collect();
        Err(format!(
            "Workflow failed. Failed tasks: {}",
            failed.join(", ")
        ))
    }
}

/// Resolve a workflow argument: a path that exists (or is absolute) is used
/// as-is; otherwise it is looked up under the configured workflow directory.
fn resolve_workflow_path(file: &str, workflow_dir: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.exists() || path.is_absolute() {
        return path;
    }
    let in_dir = Path::new(workflow_dir).join(&path);
    if in_dir.exists() {
        in_dir
    } else {
        path
    }
}

fn print_report(report: &WorkflowReport) {
    println!();
    for (i, task) in report.tasks.iter().enumerate() {
        let marker = if task.success { "✅" } else { "❌" };
        print!("{} {}. {}", marker, i + 1, task.task_name);
        if let Some(error) = &task.error {
            print!(" ({})", error);
        }
        if let Some(response) = &task.response {
            print!(" → {}", response);
        }
        println!();
    }

    println!(
        "\n{} {}/{} task(s) succeeded",
        if report.success { "🎉" } else { "⚠️" },
        report.tasks.iter().filter(|t| t.success).count(),
        report.tasks.len()
    );
}

/// Load .env and .env.local files for environment variables.
fn load_dotenv() {
    // Try .env.local first (higher priority), then .env
    for filename in &[".env.local", ".env"] {
        let path = std::path::Path::new(filename);
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                for line in content.lines() {
                    let line = line.trim();
                    // Skip comments and empty lines
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    // Parse KEY=VALUE
                    if let Some(eq_idx) = line.find('=') {
                        let key = line[..eq_idx].trim();
                        let mut value = line[eq_idx + 1..].trim().to_string();
                        // Strip surrounding quotes
                        if (value.starts_with('"') && value.ends_with('"'))
                            || (value.starts_with('\'') && value.ends_with('\''))
                        {
                            value = value[1..value.len() - 1].to_string();
                        }
                        // Existing env vars take priority
                        if std::env::var(key).is_err() {
                            std::env::set_var(key, &value);
                        }
                    }
                }
                tracing::info!("Loaded environment from '{}'", filename);
            }
        }
    }
}
