use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flightwx_api::config::{config, AppConfig};
use flightwx_api::database::{DatabaseManager, MemoryStore, PgStore};
use flightwx_api::{app, is_development, is_production, AppState};

#[derive(Parser)]
#[command(name = "flightwx-api")]
#[command(about = "Flight planning and weather briefing API server")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,

        #[arg(long, help = "Keep all data in memory instead of Postgres")]
        in_memory: bool,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, CHECK_WX_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = config().clone();
    tracing::info!("Starting FlightWX API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Command::Serve {
        port: None,
        in_memory: false,
    }) {
        Command::Serve { port, in_memory } => serve(config, port, in_memory).await,
        Command::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, port: Option<u16>, in_memory: bool) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.port);

    let state = if in_memory {
        if is_production!() {
            bail!("--in-memory is not allowed in production");
        }
        tracing::warn!("Using in-memory store; data is lost on exit");
        AppState::new(config, MemoryStore::default())?
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        if is_development!() {
            DatabaseManager::migrate(&pool).await?;
        }
        AppState::new(config, PgStore::new(pool))?
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("FlightWX API listening on http://{}", bind_addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
