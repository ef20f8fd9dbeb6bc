//! Transaction repository implementation.

use async_trait::async_trait;
use std::sync::Arc;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::transaction::{self, ActiveModel, Entity as TransactionEntity};
use crate::domain::{NewTransaction, Transaction};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transaction repository trait for dependency injection.
///
/// Every query is scoped to one owner. Result order is whatever
/// storage returns.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert a transaction owned by `user_id`
    async fn create(&self, user_id: i32, transaction: NewTransaction) -> AppResult<Transaction>;

    /// All of the owner's transactions dated exactly `date`
    async fn find_by_day(&self, user_id: i32, date: NaiveDate) -> AppResult<Vec<Transaction>>;

    /// All of the owner's transactions with `start <= date <= end`
    async fn find_by_period(
        &self,
        user_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Transaction>>;
}

/// Concrete implementation of TransactionRepository
pub struct TransactionStore {
    db: Arc<DatabaseConnection>,
}

impl TransactionStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn create(&self, user_id: i32, transaction: NewTransaction) -> AppResult<Transaction> {
        let active_model = ActiveModel {
            user_id: Set(user_id),
            date: Set(transaction.date),
            name: Set(transaction.name),
            category: Set(transaction.category),
            amount: Set(transaction.amount),
            ..Default::default()
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(Transaction::from(model))
    }

    async fn find_by_day(&self, user_id: i32, date: NaiveDate) -> AppResult<Vec<Transaction>> {
        let models = TransactionEntity::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .filter(transaction::Column::Date.eq(date))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }

    async fn find_by_period(
        &self,
        user_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Transaction>> {
        let models = TransactionEntity::find()
            .filter(transaction::Column::UserId.eq(user_id))
            .filter(transaction::Column::Date.between(start, end))
            .all(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }
}
