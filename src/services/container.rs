//! Service Container - Centralized service access.
//!
//! Owns the concrete services and hands them out as trait objects,
//! so the HTTP layer depends only on the service traits.

use std::sync::Arc;

use super::{AuthService, Authenticator, TransactionManager, TransactionService};
use crate::config::Config;
use crate::infra::UnitOfWork;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get transaction service
    fn transactions(&self) -> Arc<dyn TransactionService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    transaction_service: Arc<dyn TransactionService>,
}

impl Services {
    /// Build every service on top of one shared Unit of Work
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let transaction_service = Arc::new(TransactionManager::new(uow));

        Self {
            auth_service,
            transaction_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn transactions(&self) -> Arc<dyn TransactionService> {
        self.transaction_service.clone()
    }
}
