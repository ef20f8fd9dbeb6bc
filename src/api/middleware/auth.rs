//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

/// Pull the token out of an `Authorization` header value.
///
/// The `Bearer ` prefix is optional; an empty token is treated as absent.
pub fn extract_token(header: &str) -> Option<&str> {
    let token = header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .unwrap_or(header)
        .trim();

    (!token.is_empty()).then_some(token)
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(extract_token)
        .ok_or_else(|| {
            tracing::warn!(path = %request.uri().path(), "Missing bearer token");
            AppError::Unauthorized
        })?;

    let claims = state.auth_service.verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.user_id,
        username: claims.username,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
