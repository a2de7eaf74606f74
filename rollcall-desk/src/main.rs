//! rollcall - attendance and evacuation desk
//!
//! Works on a local SQLite roster by default, or on a shared rollcall-server
//! when `--server` (or `ROLLCALL_NETWORK_DB=1`) is given.

mod cmd;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rollcall_common::config::{RootFolderInitializer, RootFolderResolver, StoreMode, TomlConfig};
use rollcall_common::store::open_store;
use rollcall_common::RosterSession;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "rollcall: attendance and evacuation desk", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a shared rollcall-server at this URL
    #[arg(long, global = true)]
    server: Option<String>,

    /// Folder holding the local database
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// Config file (overrides ROLLCALL_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the roster with row numbers
    List(cmd::roster::ListArgs),

    /// Present, evacuated and total counts
    Counts,

    /// Show the event log
    Log(cmd::roster::LogArgs),

    /// Load a CSV or spreadsheet into a partition
    Import(cmd::import::ImportArgs),

    /// Add a placeholder entry to a partition
    Add(cmd::edit::AddArgs),

    /// Toggle presence of a row
    Present(cmd::edit::ToggleArgs),

    /// Toggle evacuation of a row (must be present)
    Evacuate(cmd::edit::ToggleArgs),

    /// Set the note of a row
    Note(cmd::edit::NoteArgs),

    /// Delete every record and the event log
    Clear(cmd::edit::ClearArgs),

    /// Follow counts and the event log until Ctrl-C
    Watch(cmd::watch::WatchArgs),
}

fn init_tracing(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    // stdout carries command output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn open_session(cli: &Cli, config: &TomlConfig) -> Result<RosterSession> {
    let mode = StoreMode::select(cli.server.as_deref(), config);

    let initializer = RootFolderInitializer::new(
        RootFolderResolver::new("rollcall").resolve(cli.root_folder.as_deref(), config),
    )
    .with_database_file(config.database_file());
    if mode == StoreMode::Local {
        initializer.ensure_directory_exists()?;
    }

    let store = open_store(&mode, &initializer.database_path(), config.remote.timeout()).await?;
    Ok(RosterSession::open(store).await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TomlConfig::load_from(path)?,
        None => TomlConfig::load()?,
    };
    init_tracing(cli.verbose, &config.logging.level);
    debug!("rollcall v{}", env!("CARGO_PKG_VERSION"));

    let mut session = open_session(&cli, &config).await?;

    match &cli.command {
        Commands::List(args) => cmd::roster::run_list(args, &session),
        Commands::Counts => cmd::roster::run_counts(&session),
        Commands::Log(args) => cmd::roster::run_log(args, &session),
        Commands::Import(args) => cmd::import::run_import(args, &mut session).await?,
        Commands::Add(args) => cmd::edit::run_add(args, &mut session).await?,
        Commands::Present(args) => cmd::edit::run_present(args, &mut session).await?,
        Commands::Evacuate(args) => cmd::edit::run_evacuate(args, &mut session).await?,
        Commands::Note(args) => cmd::edit::run_note(args, &mut session).await?,
        Commands::Clear(args) => cmd::edit::run_clear(args, &mut session).await?,
        Commands::Watch(args) => {
            cmd::watch::run_watch(args, session, config.remote.poll_interval()).await?
        }
    }

    Ok(())
}
