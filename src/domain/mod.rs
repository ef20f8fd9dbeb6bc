//! Domain layer - Core business entities and logic
//!
//! Entities and value objects with no dependency on HTTP or storage.

pub mod password;
pub mod transaction;
pub mod user;

pub use password::Password;
pub use transaction::{parse_date, parse_date_param, NewTransaction, Transaction};
pub use user::{NewUser, User};
