//! Unit of Work pattern implementation.
//!
//! Centralizes access to all repositories behind one injectable handle.
//! Every operation here is a single statement, so the unit of work does
//! not open explicit database transactions; atomicity and uniqueness are
//! left to the database.

use async_trait::async_trait;
use std::sync::Arc;

use super::db::Database;
use super::repositories::{TransactionRepository, TransactionStore, UserRepository, UserStore};
use crate::errors::AppResult;

/// Unit of Work trait for dependency injection.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get transaction repository
    fn transactions(&self) -> Arc<dyn TransactionRepository>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UnitOfWork over a Postgres connection
pub struct Persistence {
    database: Database,
    user_repo: Arc<UserStore>,
    transaction_repo: Arc<TransactionStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(database: Database) -> Self {
        let db = database.get_connection();
        let user_repo = Arc::new(UserStore::new(db.clone()));
        let transaction_repo = Arc::new(TransactionStore::new(db));
        Self {
            database,
            user_repo,
            transaction_repo,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionRepository> {
        self.transaction_repo.clone()
    }

    async fn ping(&self) -> AppResult<()> {
        self.database.ping().await?;
        Ok(())
    }
}
