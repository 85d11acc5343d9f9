use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use rpc_failover::config::load_config;
use rpc_failover::FailoverManager;

#[derive(Parser)]
#[command(name = "failover-cli")]
#[command(about = "Management CLI for the RPC failover daemon", long_about = None)]
struct Cli {
    /// Base URL of a running daemon's status server.
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-endpoint health
    Status,
    /// Show the health summary
    Health,
    /// Run one JSON-RPC call through a local manager
    Call {
        /// Path to the TOML configuration file
        #[arg(short, long, default_value = "failover.toml")]
        config: PathBuf,
        method: String,
        /// Positional parameters; each is parsed as JSON, falling back to a string
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let res = reqwest::get(format!("{}/status", cli.url)).await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = reqwest::get(format!("{}/health", cli.url)).await?;
            print_response(res).await?;
        }
        Commands::Call { config, method, params } => {
            let config = load_config(&config)?;
            let manager = FailoverManager::from_config(&config)?;
            let params = params.iter().map(|p| parse_param(p)).collect();

            let result = manager.call(&method, params).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;

    match serde_json::from_str::<Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", body),
    }
    if !status.is_success() {
        eprintln!("Error: status server returned {}", status);
    }
    Ok(())
}
