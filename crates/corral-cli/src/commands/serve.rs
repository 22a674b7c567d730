//! `corral serve` — run the agent manager API in the foreground.

use std::sync::Arc;

use corral_core::config::Config;
use corral_core::state::{AppState, AppStateInner};
use corral_server::{start_server, ServerConfig};

pub async fn run(host: &str, port: Option<u16>) -> Result<(), String> {
    let config = Config::from_env();
    let port = port.unwrap_or(config.manager_api_port);
    let state: AppState = Arc::new(AppStateInner::new(config));

    println!("Starting manager API on {}:{}...", host, port);
    let addr = start_server(
        ServerConfig {
            host: host.to_string(),
            port,
        },
        state,
    )
    .await
    .map_err(|e| e.to_string())?;
    println!("Manager API listening on http://{}", addr);

    // Keep the process running until interrupted
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("Failed to listen for Ctrl+C: {}", e))?;

    println!("\nShutting down...");
    Ok(())
}
