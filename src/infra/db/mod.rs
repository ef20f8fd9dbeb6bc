//! Database connection and schema management.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement};
use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::config::DatabaseSettings;

pub mod migrations;

pub use migrations::Migrator;

/// Shared handle to the Postgres pool.
///
/// Constructed once per command; `serve` closes it after shutdown.
#[derive(Clone)]
pub struct Database {
    connection: Arc<DatabaseConnection>,
}

impl Database {
    /// Connect and bring the schema up to date.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbErr> {
        let database = Self::connect_without_migrations(settings).await?;

        database.ping().await?;
        database.apply_pending(None).await?;
        tracing::info!(
            host = %settings.host,
            name = %settings.name,
            "Database connected and schema up to date"
        );

        Ok(database)
    }

    /// Connect without touching the schema (for the `migrate` command).
    pub async fn connect_without_migrations(settings: &DatabaseSettings) -> Result<Self, DbErr> {
        let url = settings.url().map_err(|e| DbErr::Custom(e.to_string()))?;
        let connection = SeaDatabase::connect(url).await?;
        Ok(Self {
            connection: Arc::new(connection),
        })
    }

    /// Pool handle shared with the repositories.
    pub fn get_connection(&self) -> Arc<DatabaseConnection> {
        self.connection.clone()
    }

    /// Apply up to `steps` pending migrations, or all of them.
    pub async fn apply_pending(&self, steps: Option<u32>) -> Result<(), DbErr> {
        Migrator::up(self.connection.as_ref(), steps).await
    }

    /// Revert the `steps` most recent migrations.
    pub async fn revert(&self, steps: u32) -> Result<(), DbErr> {
        Migrator::down(self.connection.as_ref(), Some(steps)).await
    }

    /// Drop the budget tables and rebuild them from scratch.
    pub async fn reset(&self) -> Result<(), DbErr> {
        Migrator::fresh(self.connection.as_ref()).await
    }

    /// Names of every known migration paired with whether it is applied.
    pub async fn migration_report(&self) -> Result<Vec<(String, bool)>, DbErr> {
        let migrations = Migrator::get_migration_with_status(self.connection.as_ref()).await?;

        Ok(migrations
            .iter()
            .map(|m| (m.name().to_string(), m.status() == MigrationStatus::Applied))
            .collect())
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }

    /// Close the connection pool.
    pub async fn close(self) -> Result<(), DbErr> {
        self.connection.close_by_ref().await?;
        tracing::info!("Database connection closed");
        Ok(())
    }
}
