//! rollcall-server - shared roster database for networked desks
//!
//! Owns the SQLite file and exposes it over HTTP so several desk clients
//! can check people in and out of the same roster.

use anyhow::Result;
use clap::Parser;
use rollcall_common::config::{RootFolderInitializer, RootFolderResolver, TomlConfig};
use rollcall_common::{RosterStore, SqliteStore};
use rollcall_server::{build_router, AppState};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rollcall-server", version, about = "Shared roster database server")]
struct Args {
    /// Folder holding the database
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// Listen address (default from config, else 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (default from config, else 5740)
    #[arg(long)]
    port: Option<u16>,

    /// Config file (overrides ROLLCALL_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TomlConfig::load_from(path)?,
        None => TomlConfig::load()?,
    };

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting rollcall-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let resolver = RootFolderResolver::new("rollcall-server");
    let root_folder = resolver.resolve(args.root_folder.as_deref(), &config);

    let initializer =
        RootFolderInitializer::new(root_folder).with_database_file(config.database_file());
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let store = match SqliteStore::open(&db_path).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };
    store.init().await?;

    let app = build_router(AppState::new(store));

    let host = args.host.unwrap_or_else(|| config.server.host.clone());
    let port = args.port.unwrap_or(config.server.port);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("rollcall-server listening on http://{}:{}", host, port);
    info!("Health check: http://{}:{}/health", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("rollcall-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
