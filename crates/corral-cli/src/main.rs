//! Corral CLI — spawn agents on demand and run declarative task workflows.
//!
//! Reuses the same core domain logic (corral-core) and manager API bootstrap
//! (corral-server) that spawned agents register against.

use clap::{Parser, Subcommand};

use corral_cli::commands;

/// Corral — minimal workflow orchestrator
#[derive(Parser)]
#[command(
    name = "corral",
    version,
    about = "Corral — spawn agents on demand and run declarative task workflows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workflow file, or the built-in sample workflow when omitted
    Run {
        /// Path to the workflow YAML file
        file: Option<String>,
        /// Port for the embedded manager API agents register against
        #[arg(long, env = "AGENT_MANAGER_API_PORT")]
        manager_port: Option<u16>,
    },

    /// Validate a workflow YAML file without executing it
    Validate {
        /// Path to the workflow YAML file
        file: String,
    },

    /// Run the agent manager API in the foreground
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(long, env = "AGENT_MANAGER_API_PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "corral_core=info,corral_server=info,corral_cli=info".into()),
        )
        .init();

    let result = match cli.command {
        Commands::Run { file, manager_port } => {
            commands::run::run(file.as_deref(), manager_port).await
        }
        Commands::Validate { file } => commands::validate::run(&file),
        Commands::Serve { host, port } => commands::serve::run(&host, port).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
