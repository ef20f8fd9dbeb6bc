//! Application configuration module
//!
//! Handles the configuration file, environment overrides and
//! application-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, ConfigError, DatabaseSettings, JwtSettings, ServerSettings};
