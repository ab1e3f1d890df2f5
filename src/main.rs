use clap::{Parser, Subcommand};
use std::process;

use tracing::info;
use tracing_subscriber::EnvFilter;

use membank::bridge::ProcessBridge;
use membank::config::{load_config, resolve_project_root, save_config, MembankConfig};
use membank::mcp::{tool_definitions, AdmissionGuard, McpServer};

/// Memory bank MCP server.
#[derive(Parser)]
#[command(name = "membank", about = "Memory bank MCP server over stdio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration to the project
    Init {
        /// Project path (default: PROJECT_PATH env, then current directory)
        path: Option<String>,
    },
    /// Print the tool catalog as JSON
    Tools,
    /// Serve MCP requests on stdin/stdout until the input closes
    Serve {
        /// Project path (default: PROJECT_PATH env, then current directory)
        #[arg(short, long)]
        path: Option<String>,
        /// Override the bridge interpreter from the config
        #[arg(long)]
        bridge_command: Option<String>,
        /// Override the bridge script path from the config
        #[arg(long)]
        bridge_script: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries only JSON-RPC responses.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> membank::errors::Result<()> {
    match cli.command {
        Commands::Init { path } => {
            let project_root = resolve_project_root(path);
            let config = MembankConfig::default();
            save_config(&project_root, &config)?;
            println!("Initialized membank config at {}", project_root.display());
        }
        Commands::Tools => {
            let tools = tool_definitions();
            println!(
                "{}",
                serde_json::to_string_pretty(&tools).unwrap_or_default()
            );
        }
        Commands::Serve {
            path,
            bridge_command,
            bridge_script,
        } => {
            let project_root = resolve_project_root(path);
            let mut config = load_config(&project_root)?;
            if let Some(command) = bridge_command {
                config.bridge_command = command;
            }
            if let Some(script) = bridge_script {
                config.bridge_script = script;
            }

            info!(
                project_root = %project_root.display(),
                bridge_command = %config.bridge_command,
                bridge_script = %config.bridge_script,
                "starting memory bank MCP server"
            );

            let bridge = ProcessBridge::new(&config, project_root);
            let guard = AdmissionGuard::from_config(&config);
            let server = McpServer::new(bridge, guard);
            server.run().await?;
        }
    }
    Ok(())
}
