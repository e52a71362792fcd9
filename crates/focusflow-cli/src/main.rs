//! CLI entry point for FocusFlow.
//!
//! This binary provides the `focusflow` command with subcommands for
//! running the web server and checking a running instance.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use focusflow_llm::{Assistant, ProviderConfig};
use focusflow_store::Database;
use focusflow_web::{WebConfig, WebServer};

/// Default database path, overridable with `FOCUSFLOW_DB`.
const DEFAULT_DB_PATH: &str = "data/focusflow.db";

/// Default HTTP port, overridable with `FOCUSFLOW_PORT` or `PORT`.
const DEFAULT_PORT: u16 = 5000;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// FocusFlow — a study-scheduling assistant.
#[derive(Parser)]
#[command(
    name = "focusflow",
    version,
    about = "FocusFlow — AI study-scheduling assistant",
    long_about = "A personal study scheduler: chat with an AI assistant and generate \
                  weekly study schedules from plain-language descriptions. Runs fully \
                  offline when no AI provider is configured."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on (overrides FOCUSFLOW_PORT / PORT).
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Query the health endpoint of a running instance.
    Status {
        /// Port the instance listens on.
        #[arg(long)]
        port: Option<u16>,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, bind).await,
        Commands::Status { port } => cmd_status(port).await,
    }
}

// ---------------------------------------------------------------------------
// Subcommand: serve
// ---------------------------------------------------------------------------

async fn cmd_serve(port: Option<u16>, bind: String) -> Result<()> {
    init_tracing("info");

    info!("starting FocusFlow");

    // Storage.
    let db_path = db_path();
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("failed to create data directory")?;
        }
    }
    let db = Database::open_and_migrate(db_path.clone())
        .await
        .context("failed to open database")?;
    info!(path = %db_path.display(), "store initialized");

    // Provider selection, logged exactly once.
    let provider = ProviderConfig::from_env();
    match &provider {
        Some(config) => info!(
            provider = config.provider.name(),
            model = %config.model,
            "AI provider configured"
        ),
        None => info!("no AI provider configured, running in fallback mode"),
    }
    let assistant = Assistant::new(provider);

    let config = WebConfig {
        bind_addr: bind,
        port: port.unwrap_or_else(port_from_env),
    };
    let server = WebServer::new(config, db, assistant);

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))
}

// ---------------------------------------------------------------------------
// Subcommand: status
// ---------------------------------------------------------------------------

async fn cmd_status(port: Option<u16>) -> Result<()> {
    init_tracing("warn");

    let port = port.unwrap_or_else(port_from_env);
    let url = format!("http://127.0.0.1:{port}/api/health");

    println!();
    println!("  FocusFlow Status");
    println!("  ================");
    println!();

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .context("failed to build HTTP client")?;

    match client.get(&url).send().await {
        Ok(resp) => {
            let body: serde_json::Value =
                resp.json().await.context("health endpoint returned non-JSON")?;
            println!("  Server:      UP ({url})");
            if body["ai_enabled"].as_bool().unwrap_or(false) {
                println!(
                    "  AI:          {}",
                    body["ai_provider"].as_str().unwrap_or("unknown")
                );
            } else {
                println!("  AI:          fallback mode (no provider configured)");
            }
        }
        Err(_) => {
            println!("  Server:      DOWN ({url})");
            println!("  Run `focusflow serve` to start it.");
        }
    }

    let db_path = db_path();
    if db_path.exists() {
        println!("  Database:    OK ({})", db_path.display());
    } else {
        println!("  Database:    NOT INITIALIZED (created on first serve)");
    }

    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn db_path() -> PathBuf {
    std::env::var("FOCUSFLOW_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH))
}

fn port_from_env() -> u16 {
    std::env::var("FOCUSFLOW_PORT")
        .or_else(|_| std::env::var("PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
