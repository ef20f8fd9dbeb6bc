//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted token lifetime (ten years)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 10 * 365 * 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default configuration file (extension resolved by the loader)
pub const DEFAULT_CONFIG_PATH: &str = "config/config";

/// Prefix for environment variable overrides, e.g. `BUDGET__JWT__SECRET`
pub const ENV_PREFIX: &str = "BUDGET";

/// Separator between nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

// =============================================================================
// Database
// =============================================================================

/// Default database host (for development)
pub const DEFAULT_DATABASE_HOST: &str = "localhost";

/// Default database port
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

/// Default database name
pub const DEFAULT_DATABASE_NAME: &str = "budget";

/// Default Postgres SSL mode
pub const DEFAULT_DATABASE_SSLMODE: &str = "disable";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Date format accepted on every endpoint
pub const DATE_FORMAT: &str = "%Y-%m-%d";

