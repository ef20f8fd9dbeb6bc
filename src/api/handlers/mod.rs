//! HTTP request handlers.

pub mod auth_handler;
pub mod transaction_handler;

pub use auth_handler::auth_routes;
pub use transaction_handler::transaction_routes;
