use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use blog_search::app::{router, AppState};
use blog_search::config::AppConfig;
use blog_search::db::repository::{PgSearchStore, SearchStore};

#[derive(Debug, Parser)]
#[command(name = "blog-search", about = "Full-text search service for blog posts")]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, env = "BLOG_SEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the search HTTP API (default).
    Serve,
    /// Create the analytics table and search indexes, then exit.
    InitSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_search=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    let store = Arc::new(PgSearchStore::connect(&config.database_url, config.max_connections).await?);
    tracing::info!("Connected to PostgreSQL");

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitSchema => {
            store.ensure_schema().await?;
        }
        Command::Serve => {
            if config.ensure_schema_on_start {
                store.ensure_schema().await?;
            }

            let state = AppState::new(store, config.track_search_requests);
            let app = router(state);

            tracing::info!("Listening on http://{}", config.listen_addr);
            let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
