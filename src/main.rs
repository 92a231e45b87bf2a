//! Paddock API
//!
//! Ingests racing-telemetry text logs (abbreviation table, race header,
//! start/end lap logs) into SQLite and serves lap-time reports over a small
//! read-only REST API.

mod cli;
mod config;
mod error;
mod ingest;
mod report;
mod routes;
mod storage;
mod types;

use clap::Parser;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::routes::AppState;
use crate::storage::RaceRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            database,
        } => run_server(Some(host), Some(port), database).await,
        Commands::Ingest {
            abbreviations,
            race_data,
            start_log,
            end_log,
            database,
        } => cli::run_ingest(abbreviations, race_data, start_log, end_log, database),
    }
}

/// Run the API server.
async fn run_server(
    host: Option<String>,
    port: Option<u16>,
    database: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddock_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(db) = database {
        config.database.path = db.to_string_lossy().to_string();
    }

    tracing::info!("Configuration loaded");
    tracing::info!("Database path: {}", config.database.path);

    // Open storage; one connection for the life of the process
    let repo = RaceRepository::open(Path::new(&config.database.path))?;
    tracing::info!("Database ready");

    // Create application state
    let state = Arc::new(AppState {
        repo: Mutex::new(repo),
    });

    // Build router
    let app = routes::build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
