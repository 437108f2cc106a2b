use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, MIGRATOR};

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending migrations")]
    Migrate,

    #[command(about = "Check connectivity")]
    Check,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config::config().database).await?;

    match cmd {
        DbCommands::Migrate => {
            DatabaseManager::run_migrations(&pool).await?;
            let versions: Vec<i64> = MIGRATOR.iter().map(|migration| migration.version).collect();
            output_success(
                &output_format,
                &format!("Applied migrations up to version {}", versions.last().copied().unwrap_or_default()),
                Some(json!({ "versions": versions })),
            )
        }
        DbCommands::Check => {
            DatabaseManager::health_check(&pool).await?;
            output_success(&output_format, "Database is reachable", None)
        }
    }
}
