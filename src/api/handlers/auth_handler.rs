//! Authentication handlers.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// User registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    #[schema(example = "alice")]
    pub username: String,
    /// User password (minimum 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret1", min_length = 6)]
    pub password: String,
    /// User email address
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "alice@example.com")]
    pub email: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "Username must be 1-255 characters"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "alice@example.com")]
    pub email: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/password/reset", post(request_password_reset))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "Validation error or username/email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .register(payload.username, payload.email, payload.password)
        .await?;

    Ok(Json(MessageResponse::new("Registration successful")))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}

/// Request a password reset
///
/// Acknowledges known addresses only; no reset mail is sent.
#[utoipa::path(
    post,
    path = "/password/reset",
    tag = "Authentication",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset request acknowledged", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "No user with this email")
    )
)]
pub async fn request_password_reset(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<PasswordResetRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .auth_service
        .request_password_reset(payload.email)
        .await?;

    Ok(Json(MessageResponse::new(
        "Password reset instructions have been sent to your email",
    )))
}
