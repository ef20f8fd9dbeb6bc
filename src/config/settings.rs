//! Application settings loaded from a YAML file and environment overrides.

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_DATABASE_HOST, DEFAULT_DATABASE_NAME, DEFAULT_DATABASE_PORT,
    DEFAULT_DATABASE_SSLMODE, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, ENV_PREFIX, ENV_SEPARATOR, MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("jwt.secret must be at least {0} characters long")]
    InsecureSecret(usize),

    #[error("jwt.expiry_hours must be between 1 and {}, got {0}", MAX_JWT_EXPIRATION_HOURS)]
    InvalidExpiry(i64),

    #[error("Invalid database settings: {0}")]
    InvalidDatabaseUrl(String),
}

/// Application configuration
#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Postgres connection settings.
///
/// `url` wins when set; otherwise the URL is assembled from the parts.
#[derive(Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    password: String,
    #[serde(default = "default_db_name")]
    pub name: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
}

/// Token signing settings
#[derive(Clone, Deserialize)]
pub struct JwtSettings {
    secret: String,
    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: i64,
}

fn default_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_db_host() -> String {
    DEFAULT_DATABASE_HOST.to_string()
}

fn default_db_port() -> u16 {
    DEFAULT_DATABASE_PORT
}

fn default_db_name() -> String {
    DEFAULT_DATABASE_NAME.to_string()
}

fn default_sslmode() -> String {
    DEFAULT_DATABASE_SSLMODE.to_string()
}

fn default_expiry_hours() -> i64 {
    DEFAULT_JWT_EXPIRATION_HOURS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: default_db_host(),
            port: default_db_port(),
            user: String::new(),
            password: String::new(),
            name: default_db_name(),
            sslmode: default_sslmode(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("database", &self.database)
            .field("jwt", &self.jwt)
            .finish()
    }
}

impl std::fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "[REDACTED]"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .finish()
    }
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from `path` (defaults to `config/config.yaml`),
    /// then apply `BUDGET__SECTION__KEY` environment overrides.
    ///
    /// A missing file is not an error as long as the required keys
    /// arrive through the environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        let config: Config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        tracing::debug!(path, "Configuration loaded");
        Ok(config)
    }

    /// Build a configuration in code (tests, embedding).
    pub fn new(server: ServerSettings, database: DatabaseSettings, jwt: JwtSettings) -> Self {
        Self {
            server,
            database,
            jwt,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::InsecureSecret(MIN_JWT_SECRET_LENGTH));
        }
        self.database.url()?;
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.jwt.expiry_hours) {
            return Err(ConfigError::InvalidExpiry(self.jwt.expiry_hours));
        }
        Ok(())
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt.secret.as_bytes()
    }

    /// Token lifetime in hours.
    pub fn jwt_expiration_hours(&self) -> i64 {
        self.jwt.expiry_hours
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseSettings {
    /// Connection URL understood by sea-orm / sqlx.
    ///
    /// Credentials are percent-encoded, so any password is accepted.
    pub fn url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let mut url = Url::parse(&format!("postgres://{}:{}", self.host, self.port))
            .map_err(|e| ConfigError::InvalidDatabaseUrl(e.to_string()))?;
        url.set_path(&self.name);

        if !self.user.is_empty() {
            let rejected = || ConfigError::InvalidDatabaseUrl("credentials rejected".to_string());
            url.set_username(&self.user).map_err(|_| rejected())?;
            if !self.password.is_empty() {
                url.set_password(Some(&self.password))
                    .map_err(|_| rejected())?;
            }
        }

        url.query_pairs_mut().append_pair("sslmode", &self.sslmode);
        Ok(url.into())
    }
}

impl JwtSettings {
    pub fn new(secret: impl Into<String>, expiry_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }
}
