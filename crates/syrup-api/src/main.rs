//! Syrup server entry point.
//!
//! Binary name: `syrupd`
//!
//! Parses CLI arguments, loads configuration, initializes the database
//! and services, then starts the HTTP and WebSocket server.

mod http;
mod state;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use syrup_types::config::ServerConfig;

use state::AppState;

#[derive(Parser)]
#[command(name = "syrupd", about = "Syrup realtime chat backend", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP and WebSocket server
    Serve {
        /// Path to a config.toml (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,

        /// Export spans via OpenTelemetry (stdout exporter)
        #[arg(long)]
        otel: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,syrup=debug",
        _ => "trace",
    };

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            otel,
        } => {
            syrup_observe::tracing_setup::init_tracing(filter, otel)
                .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

            let mut config = load_config(config.as_deref())?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }

            serve(config).await?;

            syrup_observe::tracing_setup::shutdown_tracing();
        }
    }

    Ok(())
}

/// Load configuration from an optional TOML file, then apply
/// environment overrides for the deployment-sensitive values.
fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)?
        }
        None => ServerConfig::default(),
    };

    if let Ok(secret) = std::env::var("SYRUP_JWT_SECRET") {
        config.jwt_secret = secret;
    }
    if let Ok(url) = std::env::var("SYRUP_DATABASE_URL") {
        config.database_url = url;
    }

    Ok(config)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    if config.jwt_secret == "change-me-in-production" {
        tracing::warn!("using the default JWT secret; set SYRUP_JWT_SECRET for real deployments");
    }

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::init(config).await?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Syrup listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
