//! Study Assistant - AI-assisted study backend.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use study_assistant::ai::AiClient;
use study_assistant::config::{AppConfig, ConfigError, ConfigLoader};
use study_assistant::display;
use study_assistant::server::api::MAX_DUE_LIMIT;
use study_assistant::server::{AppState, ServerError, StudyServer};
use study_assistant::store::{Store, StoreError};

#[derive(Parser)]
#[command(
    name = "study-assistant",
    about = "AI-assisted study backend with spaced repetition",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API.
    Serve {
        /// Path to a config file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Host address to bind to.
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on.
        #[arg(short, long)]
        port: Option<u16>,
        /// Path to the database.
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// List flashcards due for review.
    Due {
        /// Path to a config file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Path to the database.
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Server(#[from] ServerError),
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_config(path: Option<PathBuf>, database: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let loader = path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let mut config = loader.load_with_env()?;
    if let Some(database) = database {
        config.storage.database_path = database;
    }
    Ok(config)
}

async fn serve(mut config: AppConfig) -> Result<(), AppError> {
    let store = Store::open(&config.storage.database_path).await?;

    let mut state = AppState::new(store, config.storage.default_user_id.as_str());
    match AiClient::from_config(config.ai.clone()) {
        Ok(client) => {
            tracing::info!(
                provider = ?client.provider_kind(),
                model = %client.model(),
                "AI client configured"
            );
            state = state.with_ai(client);
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI features disabled");
        }
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C");
        }
        signal_cancel.cancel();
    });

    let server_config = std::mem::take(&mut config.server);
    StudyServer::new(state.with_cancel(cancel))
        .with_config(server_config)
        .run()
        .await?;
    Ok(())
}

async fn list_due(config: &AppConfig) -> Result<(), AppError> {
    let store = Store::open(&config.storage.database_path).await?;
    let now = Utc::now();
    let cards = store.due_flashcards(now, MAX_DUE_LIMIT).await?;
    display::print_due_flashcards(&cards, now);
    Ok(())
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            database,
        } => {
            let mut config = load_config(config, database)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Due { config, database } => {
            let config = load_config(config, database)?;
            list_due(&config).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "study-assistant failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
