//! Migrate command - Schema management for the users and transactions tables.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // `fresh` is refused before any connection is made
    if let MigrateAction::Fresh { yes } = args.action {
        confirm_reset(yes)?;
    }

    let db = Database::connect_without_migrations(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up { steps } => {
            db.apply_pending(steps).await?;
            tracing::info!(?steps, "Pending migrations applied");
        }
        MigrateAction::Down { steps } => {
            db.revert(steps).await?;
            tracing::info!(steps, "Migrations reverted");
        }
        MigrateAction::Status => {
            let report = db.migration_report().await?;
            let pending = report.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &report {
                tracing::info!(migration = %name, applied, "Migration status");
            }
            tracing::info!(total = report.len(), pending, "Schema status");
        }
        MigrateAction::Fresh { .. } => {
            tracing::warn!("Dropping all users and transactions");
            db.reset().await?;
            tracing::info!("Schema rebuilt from scratch");
        }
    }

    db.close().await?;
    Ok(())
}

/// `fresh` destroys every account and transaction, so it needs `--yes`.
fn confirm_reset(yes: bool) -> AppResult<()> {
    if yes {
        return Ok(());
    }
    tracing::warn!("Refusing to reset the schema without --yes");
    Err(AppError::validation(
        "migrate fresh deletes all users and transactions; rerun with --yes",
    ))
}
