//! Transaction service - Recording and querying a user's transactions.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{parse_date_param, NewTransaction, Transaction};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Transaction service trait for dependency injection.
///
/// `user_id` always comes from a verified token, never from the request body.
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Validate and store a transaction for `user_id`
    async fn add_transaction(
        &self,
        user_id: i32,
        date: &str,
        name: String,
        category: String,
        amount: f64,
    ) -> AppResult<Transaction>;

    /// Transactions dated exactly `date`
    async fn transactions_by_day(&self, user_id: i32, date: &str) -> AppResult<Vec<Transaction>>;

    /// Transactions dated within `[start_date, end_date]`
    async fn transactions_by_period(
        &self,
        user_id: i32,
        start_date: &str,
        end_date: &str,
    ) -> AppResult<Vec<Transaction>>;
}

/// Concrete implementation of TransactionService using Unit of Work.
pub struct TransactionManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TransactionManager<U> {
    /// Create new transaction service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TransactionService for TransactionManager<U> {
    async fn add_transaction(
        &self,
        user_id: i32,
        date: &str,
        name: String,
        category: String,
        amount: f64,
    ) -> AppResult<Transaction> {
        let new_transaction = NewTransaction::new(date, name, category, amount).map_err(|e| {
            tracing::warn!(user_id, %date, amount, "Rejected transaction: {}", e);
            e
        })?;

        let transaction = self
            .uow
            .transactions()
            .create(user_id, new_transaction)
            .await?;

        tracing::info!(
            user_id,
            transaction_id = transaction.id,
            category = %transaction.category,
            amount = transaction.amount,
            "Transaction added"
        );
        Ok(transaction)
    }

    async fn transactions_by_day(&self, user_id: i32, date: &str) -> AppResult<Vec<Transaction>> {
        let day = parse_date_param("date", date)?;

        let transactions = self.uow.transactions().find_by_day(user_id, day).await?;

        tracing::info!(user_id, %day, count = transactions.len(), "Fetched transactions for day");
        Ok(transactions)
    }

    async fn transactions_by_period(
        &self,
        user_id: i32,
        start_date: &str,
        end_date: &str,
    ) -> AppResult<Vec<Transaction>> {
        let start = parse_date_param("start_date", start_date)?;
        let end = parse_date_param("end_date", end_date)?;

        // An inverted range matches nothing
        if start > end {
            tracing::debug!(user_id, %start, %end, "Inverted period, returning no transactions");
            return Ok(Vec::new());
        }

        let transactions = self
            .uow
            .transactions()
            .find_by_period(user_id, start, end)
            .await?;

        tracing::info!(
            user_id,
            %start,
            %end,
            count = transactions.len(),
            "Fetched transactions for period"
        );
        Ok(transactions)
    }
}
