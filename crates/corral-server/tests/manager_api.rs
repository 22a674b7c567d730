//! Integration tests for the manager API, run over a real socket on an
//! ephemeral port, plus an end-to-end spawn → wait → dispatch run against a
//! fake agent server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use corral_core::config::Config;
use corral_core::error::OrchestratorError;
use corral_core::health::{HttpHealthProbe, ReadinessWaiter};
use corral_core::spawner::{AgentSpawner, ContainerRuntime, RunRequest};
use corral_core::state::{AppState, AppStateInner};
use corral_core::workflow::dispatcher::TaskDispatcher;
use corral_core::workflow::executor::WorkflowRunner;
use corral_core::workflow::schema::Workflow;
use corral_server::{start_server, ServerConfig};

async fn test_server() -> (AppState, SocketAddr) {
    let state: AppState = Arc::new(AppStateInner::new(Config::default()));
    let addr = start_server(
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        state.clone(),
    )
    .await
    .expect("server should start on an ephemeral port");
    (state, addr)
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_state, addr) = test_server().await;

    let body: serde_json::Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["server"], "corral-server");
}

#[tokio::test]
async fn test_register_list_deregister_flow() {
    let (state, addr) = test_server().await;
    let client = reqwest::Client::new();
    let base = format!("http://{}/api/agents", addr);

    // Register
    let response = client
        .post(format!("{}/register", base))
        .json(&json!({ "name": "builder", "url": "http://builder:5000" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["agent"]["name"], "builder");
    assert_eq!(body["agent"]["url"], "http://builder:5000");

    // The readiness waiter reads the same registry the API writes.
    assert_eq!(
        state.registry.url_of("builder").await.as_deref(),
        Some("http://builder:5000")
    );

    // List
    let body: serde_json::Value = client.get(&base).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["agents"].as_array().unwrap().len(), 1);

    // Deregister
    let response = client
        .delete(format!("{}/builder", base))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    assert!(state.registry.url_of("builder").await.is_none());

    // A second delete is a 404.
    let response = client
        .delete(format!("{}/builder", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_rejects_blank_fields() {
    let (_state, addr) = test_server().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/api/agents/register", addr))
        .json(&json!({ "name": "builder", "url": "  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("required"));
}

/// Pretends every agent container is already running, so the runner never
/// shells out to docker.
struct AlreadyRunning;

impl ContainerRuntime for AlreadyRunning {
    async fn list_running(&self, name_filter: &str) -> Result<String, OrchestratorError> {
        Ok(name_filter.to_string())
    }

    async fn run_detached(&self, _request: &RunRequest) -> Result<(), OrchestratorError> {
        unreachable!("nothing should be spawned in this test")
    }
}

/// A minimal agent: answers its health endpoint and echoes task dispatches.
async fn spawn_fake_agent() -> SocketAddr {
    let app = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route(
            "/task",
            post(|Json(task): Json<serde_json::Value>| async move {
                Json(json!({
                    "status": "success",
                    "task": task["name"],
                    "output": "built\n",
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_workflow_dispatches_to_registered_agent() {
    let (state, manager_addr) = test_server().await;
    let agent_addr = spawn_fake_agent().await;

    // The agent announces itself over HTTP, like a spawned container would.
    let client = reqwest::Client::new();
    client
        .post(format!("http://{}/api/agents/register", manager_addr))
        .json(&json!({ "name": "builder", "url": format!("http://{}", agent_addr) }))
        .send()
        .await
        .unwrap()
        .error_for_status()
        .unwrap();

    let runner = WorkflowRunner::with_parts(
        AgentSpawner::with_runtime(AlreadyRunning, Config::default()),
        ReadinessWaiter::with_schedule(state.registry.clone(), Duration::from_millis(10), 50),
        TaskDispatcher::new("."),
        HttpHealthProbe::new(),
    );

    let workflow = Workflow::from_yaml(
        r#"
tasks:
  - name: build
    command: make all
    agent: builder

agents:
  - name: builder
"#,
    )
    .unwrap();

    let report = runner.run_workflow(&workflow).await.unwrap();
    assert!(report.success);

    let response = report.tasks[0].response.as_ref().unwrap();
    assert_eq!(response["status"], "success");
    assert_eq!(response["task"], "build");
}
