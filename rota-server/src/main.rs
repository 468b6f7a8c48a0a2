//! Rota CLI - serve and administer the reviewer assignment API

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rota_core::{CliOverrides, Config};
use rota_db::{Database, DatabaseConfig};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Rota: automatic reviewer assignment for pull requests
#[derive(Parser, Debug)]
#[command(name = "rota")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the SQLite database (overrides config and env)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API until interrupted
    Serve {
        /// Address to listen on (overrides config and env)
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Apply database migrations and exit
    Migrate,

    /// Show current configuration
    Config,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let listen = match &cli.command {
        Some(Commands::Serve { listen }) => *listen,
        _ => None,
    };
    let config = Config::load_with_overrides(CliOverrides {
        database_path: cli.database.clone(),
        listen,
    })?;

    if cli.verbose {
        tracing::debug!(
            database = %config.database.path.display(),
            listen = %config.server.listen,
            operation_timeout = ?config.engine.operation_timeout,
            "Configuration loaded"
        );
    }

    match cli.command {
        Some(Commands::Serve { .. }) => serve(&config).await?,
        Some(Commands::Migrate) => {
            let db = Database::open(DatabaseConfig::from(config.database.clone())).await?;
            db.close().await;
            println!("Migrations applied to {}", config.database.path.display());
        }
        Some(Commands::Config) => print_config(&config),
        Some(Commands::Version) => {
            println!("rota {}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("Rota - automatic reviewer assignment for pull requests");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let (db, service) = rota_server::open_service(config).await?;
    let listener = TcpListener::bind(config.server.listen).await?;

    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl-c");
        }
        tracing::info!("Shutdown requested");
        trigger.cancel();
    });

    rota_server::serve(listener, service, shutdown).await?;
    db.close().await;
    Ok(())
}

fn print_config(config: &Config) {
    println!("Rota Configuration");
    println!("==================");
    println!();
    println!("Database:");
    println!("  path: {}", config.database.path.display());
    println!("  max_connections: {}", config.database.max_connections);
    println!("  busy_timeout: {:?}", config.database.busy_timeout);
    println!();
    println!("Server:");
    println!("  listen: {}", config.server.listen);
    println!();
    println!("Engine:");
    println!("  operation_timeout: {:?}", config.engine.operation_timeout);
    println!();
    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }
}
