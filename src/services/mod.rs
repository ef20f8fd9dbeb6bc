//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion and reach repositories through the Unit of Work.

mod auth_service;
pub mod container;
mod transaction_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{
    generate_token, verify_token, AuthService, Authenticator, Claims, TokenResponse,
};
pub use transaction_service::{TransactionManager, TransactionService};
