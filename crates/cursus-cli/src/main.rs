//! Cursus CLI
//!
//! Main entry point for running the Cursus course catalog server.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cursus_api::{create_router, AppState, ServerConfig};
use cursus_store::{JsonFileStore, StoreHandle};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Cursus - Course Catalog Server
///
/// Serves a REST API for managing courses and their sessions. The whole
/// catalog is persisted as a single JSON document on disk.
#[derive(Parser, Debug)]
#[command(name = "cursus")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: cursus.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Path to the JSON data file (overrides the configured value)
    #[arg(short, long, value_name = "FILE")]
    data_file: Option<String>,

    /// Host address to bind (overrides the configured value)
    #[arg(long, value_name = "HOST")]
    host: Option<String>,

    /// Port for the HTTP API server (overrides the configured value)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing subscriber with appropriate filter
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Cursus server starting");
    tracing::debug!(config = ?args.config, "Config file");
    tracing::debug!(data_file = ?args.data_file, "Data file override");

    // Run the server and handle errors
    match run_server(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Runs the catalog server.
///
/// This function drives the whole startup sequence:
/// 1. Load config and apply CLI overrides
/// 2. Prepare the data file location
/// 3. Build the store and HTTP router
/// 4. Serve until Ctrl+C
async fn run_server(args: Args) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI argument overrides
    if let Some(ref data_file) = args.data_file {
        config.data_file.clone_from(data_file);
    }
    if let Some(ref host) = args.host {
        config.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Re-validate after overrides
    config.validate()?;

    print_config(&config);

    // Prepare the data file location
    let data_path = PathBuf::from(&config.data_file);
    if let Some(parent) = data_path.parent() {
        // Path::parent yields an empty path for bare file names
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create data directory: {e}\n\nPath: {}",
                    parent.display()
                )
            })?;
        }
    }

    println!();
    if data_path.exists() {
        println!("Using existing data file: {}", data_path.display());
    } else {
        println!("Starting with a fresh catalog: {}", data_path.display());
    }

    // Build the store and HTTP router
    let store = StoreHandle::new(JsonFileStore::new(&data_path));
    let state = AppState::new(store);
    let router = create_router(state);

    // Bind and serve
    let host: IpAddr = config.host.parse().map_err(|e| {
        anyhow::anyhow!(
            "Invalid host '{}': {e}\n\nSuggestion: Use an IP address such as 127.0.0.1 or 0.0.0.0",
            config.host
        )
    })?;
    let addr = SocketAddr::new(host, config.port);

    println!();
    println!("Starting HTTP API server on {addr}...");

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    println!("Course catalog API running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {e}"))?;

    println!();
    println!("Server stopped");

    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<ServerConfig> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            ServerConfig::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => ServerConfig::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Resolves once Ctrl+C is received.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for shutdown signal");
            // Keep serving if the signal handler cannot be registered
            std::future::pending::<()>().await;
        }
    }
}

/// Prints the loaded configuration.
fn print_config(config: &ServerConfig) {
    println!("Configuration loaded:");
    println!("  Data file: {}", config.data_file);
    println!("  Host: {}", config.host);
    println!("  Port: {}", config.port);
}
