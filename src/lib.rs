//! Budget API - Personal budgeting backend
//!
//! Users register, log in for a bearer token, and record dated, categorized
//! spending transactions that they can list by day or by period.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Authentication and transaction use cases
//! - **infra**: Database, migrations and repositories
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Transaction, User};
pub use errors::{AppError, AppResult};
