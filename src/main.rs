use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use notes_api::app::{app, AppState};
use notes_api::auth::JwtSessionProvider;
use notes_api::config::{self, Storage};
use notes_api::database::{DatabaseManager, MemoryNoteStore, NoteStore, PgNoteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    init_tracing(config.api.enable_request_logging);
    tracing::info!("Starting Notes API in {:?} mode", config.environment);

    config.validate().context("invalid configuration")?;

    let store: Arc<dyn NoteStore> = match config.database.storage {
        Storage::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on exit");
            Arc::new(MemoryNoteStore::new())
        }
        Storage::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to PostgreSQL")?;
            if config.database.run_migrations {
                DatabaseManager::run_migrations(&pool)
                    .await
                    .context("failed to apply migrations")?;
            }
            Arc::new(PgNoteStore::new(pool))
        }
    };

    let sessions = JwtSessionProvider::from_config(&config.security)
        .context("failed to initialize session provider")?;
    let state = AppState::new(store, Arc::new(sessions), config.clone());

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Notes API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

fn init_tracing(request_logging: bool) {
    let default_directives = if request_logging {
        "notes_api=info,tower_http=debug"
    } else {
        "notes_api=info,tower_http=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
