use std::time::Duration;

use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn notebook_not_found() -> Self {
        DatabaseError::NotFound("Notebook not found".to_string())
    }

    pub fn note_not_found() -> Self {
        DatabaseError::NotFound("Note not found".to_string())
    }
}

/// Connection pool setup and schema management for PostgreSQL
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool using the configured URL and limits
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let raw = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = Self::validate_url(raw)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&connection_string)
            .await?;

        info!(
            max_connections = config.max_connections,
            "Created database pool"
        );
        Ok(pool)
    }

    /// Apply embedded migrations that have not run yet
    pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
        MIGRATOR.run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn validate_url(raw: &str) -> Result<String, DatabaseError> {
        let url = url::Url::parse(raw.trim()).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match url.scheme() {
            "postgres" | "postgresql" => {}
            _ => return Err(DatabaseError::InvalidDatabaseUrl),
        }
        if url.path().trim_start_matches('/').is_empty() {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        Ok(url.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_postgres_urls_with_database() {
        assert!(DatabaseManager::validate_url("postgres://user:pw@localhost:5432/notes").is_ok());
        assert!(DatabaseManager::validate_url(" postgresql://localhost/notes ").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_missing_database() {
        for raw in ["mysql://localhost/notes", "postgres://localhost", "postgres://localhost/", "not a url"] {
            assert!(
                matches!(DatabaseManager::validate_url(raw), Err(DatabaseError::InvalidDatabaseUrl)),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn connect_requires_url() {
        let config = crate::config::AppConfig::development().database;
        let result = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(DatabaseManager::connect(&config));
        assert!(matches!(result, Err(DatabaseError::ConfigMissing("DATABASE_URL"))));
    }
}
