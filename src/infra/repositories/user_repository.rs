//! User repository implementation.

use async_trait::async_trait;
use std::sync::Arc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user.
    ///
    /// Returns `AppError::Conflict` when the username or email is taken;
    /// the check is the storage unique constraint, so it holds under
    /// concurrent registrations.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Map a unique-constraint violation to a conflict, anything else to a database error.
fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(%detail, "Unique constraint violated on users");
            AppError::conflict("User with this username or email")
        }
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            username: Set(user.username),
            email: Set(user.email),
            password: Set(user.password_hash),
            ..Default::default()
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(map_insert_error)?;
        Ok(User::from(model))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn row(id: i32, username: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            password: "$argon2id$stub".to_string(),
            email: format!("{}@example.com", username),
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[test]
    fn test_non_unique_failure_is_not_a_conflict() {
        let err = map_insert_error(DbErr::Custom("connection reset".to_string()));

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_insert_failure_surfaces_as_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("disk full".to_string())])
            .into_connection();
        let repo = UserStore::new(Arc::new(db));

        let err = repo.create(new_user("alice")).await.unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_create_returns_stored_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(1, "alice")]])
            .into_connection();
        let repo = UserStore::new(Arc::new(db));

        let user = repo.create(new_user("alice")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_find_by_username_filters_on_username() {
        let connection = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![row(1, "alice")]])
                .into_connection(),
        );
        let repo = UserStore::new(connection.clone());

        let found = repo.find_by_username("alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(1));
        drop(repo);

        let log = Arc::into_inner(connection)
            .expect("store dropped")
            .into_transaction_log();
        let statement = &log[0].statements()[0];
        assert!(statement.sql.contains(r#""users"."username" = $1"#), "{}", statement.sql);
        let values = statement.values.clone().map(|v| v.0).unwrap_or_default();
        assert_eq!(values.first(), Some(&Value::from("alice")));
    }

    #[tokio::test]
    async fn test_find_by_email_miss_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();
        let repo = UserStore::new(Arc::new(db));

        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }
}
