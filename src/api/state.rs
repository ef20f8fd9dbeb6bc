//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{AuthService, ServiceContainer, Services, TransactionService};

/// Application state containing all services (DI container).
///
/// Cloned into every request; all fields are shared handles.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Transaction service
    pub transaction_service: Arc<dyn TransactionService>,
    /// Storage handle, used for health checks
    pub storage: Arc<dyn UnitOfWork>,
}

impl AppState {
    /// Create application state backed by a Postgres database.
    pub fn from_database(database: Database, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(database)), config)
    }

    /// Create application state on top of any Unit of Work implementation.
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        let container = Services::from_unit_of_work(uow.clone(), config);

        Self {
            auth_service: container.auth(),
            transaction_service: container.transactions(),
            storage: uow,
        }
    }
}
