//! Authentication service - Registration, login and token handling.
//!
//! Password hashing lives in the domain `Password` value object;
//! repository access goes through the Unit of Work.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Only HS256 tokens are issued or accepted.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Verified against when the username is unknown, so both login failure
/// paths pay for one Argon2 computation.
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, username: String, email: String, password: String)
        -> AppResult<User>;

    /// Login and return a signed token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Acknowledge a password reset request for a known email
    async fn request_password_reset(&self, email: String) -> AppResult<()>;

    /// Verify a token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Sign a token for `user` valid for the configured number of hours.
pub fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let lifetime_secs = config
        .jwt_expiration_hours()
        .checked_mul(SECONDS_PER_HOUR)
        .ok_or_else(|| AppError::internal("Token lifetime overflows"))?;
    let expires_at = Duration::try_seconds(lifetime_secs)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AppError::internal("Token expiry out of range"))?;

    let claims = Claims {
        user_id: user.id,
        username: user.username.clone(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::new(TOKEN_ALGORITHM),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

    Ok(TokenResponse {
        token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: lifetime_secs,
    })
}

/// Check signature, algorithm and expiry (no leeway).
pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<User> {
        // Length is checked before hashing, so a short password never reaches storage
        let password_hash = Password::new(&password)?.into_string();

        let new_user = NewUser {
            username: username.clone(),
            email,
            password_hash,
        };

        match self.uow.users().create(new_user).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "User registered");
                Ok(user)
            }
            Err(e @ AppError::Conflict(_)) => {
                tracing::warn!(%username, "Registration rejected: username or email taken");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        let user = self.uow.users().find_by_username(&username).await?;

        let Some(user) = user else {
            let _ = Password::from_hash(DUMMY_HASH.to_string()).verify(&password);
            tracing::warn!(%username, "Login failed: unknown username");
            return Err(AppError::InvalidCredentials);
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            tracing::warn!(%username, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = generate_token(&user, &self.config)?;
        tracing::info!(user_id = user.id, %username, "User logged in");
        Ok(token)
    }

    async fn request_password_reset(&self, email: String) -> AppResult<()> {
        let Some(user) = self.uow.users().find_by_email(&email).await? else {
            tracing::warn!(%email, "Password reset requested for unknown email");
            return Err(AppError::NotFound);
        };

        // No reset token or mail delivery exists yet; the request is only recorded.
        tracing::info!(user_id = user.id, "Password reset requested");
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token(token, &self.config).map_err(|e| {
            tracing::warn!(error = %e, "Token rejected");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseSettings, JwtSettings, ServerSettings};
    use crate::infra::{MockTransactionRepository, MockUserRepository, TransactionRepository, UserRepository};
    use mockall::predicate::eq;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    struct TestUnitOfWork {
        users: Arc<MockUserRepository>,
    }

    #[async_trait]
    impl UnitOfWork for TestUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone()
        }

        fn transactions(&self) -> Arc<dyn TransactionRepository> {
            Arc::new(MockTransactionRepository::new())
        }

        async fn ping(&self) -> AppResult<()> {
            Ok(())
        }
    }

    fn test_config() -> Config {
        Config::new(
            ServerSettings::default(),
            DatabaseSettings::default(),
            JwtSettings::new(SECRET, 24),
        )
    }

    fn authenticator(repo: MockUserRepository) -> Authenticator<TestUnitOfWork> {
        let uow = TestUnitOfWork {
            users: Arc::new(repo),
        };
        Authenticator::new(Arc::new(uow), test_config())
    }

    fn stored_user(id: i32, username: &str, password: &str) -> User {
        User {
            id,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: Password::new(password).unwrap().into_string(),
        }
    }

    fn sign(claims: &Claims, algorithm: Algorithm, secret: &str) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_out_of_range_lifetime_is_an_error() {
        let user = stored_user(1, "alice", "secret1");

        for hours in [3_000_000_000, i64::MAX] {
            let config = Config::new(
                ServerSettings::default(),
                DatabaseSettings::default(),
                JwtSettings::new(SECRET, hours),
            );
            let result = generate_token(&user, &config);
            assert!(matches!(result, Err(AppError::Internal(_))), "hours {}", hours);
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|user| {
                user.username == "alice"
                    && user.password_hash != "secret1"
                    && Password::from_hash(user.password_hash.clone()).verify("secret1")
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: 1,
                    username: user.username,
                    email: user.email,
                    password_hash: user.password_hash,
                })
            });

        let result = authenticator(repo)
            .register("alice".into(), "a@x.com".into(), "secret1".into())
            .await;

        assert_eq!(result.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_register_short_password_never_reaches_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let result = authenticator(repo)
            .register("alice".into(), "a@x.com".into(), "12345".into())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .returning(|_| Err(AppError::conflict("User with this username or email")));

        let result = authenticator(repo)
            .register("alice".into(), "a@x.com".into(), "secret1".into())
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_token_carries_user_id() {
        let user = stored_user(42, "alice", "secret1");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .with(eq("alice"))
            .returning(move |_| Ok(Some(user.clone())));

        let auth = authenticator(repo);
        let response = auth.login("alice".into(), "secret1".into()).await.unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 24 * SECONDS_PER_HOUR);

        let claims = auth.verify_token(&response.token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let user = stored_user(42, "alice", "secret1");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_username()
            .with(eq("alice"))
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_find_by_username()
            .with(eq("mallory"))
            .returning(|_| Ok(None));

        let auth = authenticator(repo);
        let wrong_password = auth.login("alice".into(), "secret2".into()).await;
        let unknown_user = auth.login("mallory".into(), "secret1".into()).await;

        let wrong_password = wrong_password.unwrap_err();
        let unknown_user = unknown_user.unwrap_err();
        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.status(), unknown_user.status());
    }

    #[tokio::test]
    async fn test_password_reset_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let result = authenticator(repo)
            .request_password_reset("nobody@x.com".into())
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_password_reset_known_email() {
        let user = stored_user(1, "alice", "secret1");
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .with(eq("alice@example.com"))
            .returning(move |_| Ok(Some(user.clone())));

        let result = authenticator(repo)
            .request_password_reset("alice@example.com".into())
            .await;

        assert!(result.is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 1,
            username: "alice".into(),
            exp: now - 1,
            iat: now - 3600,
        };
        let token = sign(&claims, Algorithm::HS256, SECRET);

        let result = verify_token(&token, &test_config());
        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 1,
            username: "alice".into(),
            exp: now + 3600,
            iat: now,
        };
        let token = sign(&claims, Algorithm::HS256, "another-secret-key-that-is-32-chars!!");

        assert!(verify_token(&token, &test_config()).is_err());
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 1,
            username: "alice".into(),
            exp: now + 3600,
            iat: now,
        };
        let token = sign(&claims, Algorithm::HS512, SECRET);

        assert!(verify_token(&token, &test_config()).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token", &test_config()).is_err());
        assert!(verify_token("", &test_config()).is_err());
    }
}
