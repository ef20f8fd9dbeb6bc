//! OpenAPI documentation configuration.
//!
//! The generated document is served as JSON at `/api-docs/openapi.json`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, transaction_handler};
use crate::domain::Transaction;
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Budget API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Budget API",
        version = "0.1.0",
        description = "Personal budgeting backend with token authentication",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::request_password_reset,
        // Transaction endpoints
        transaction_handler::add_transaction,
        transaction_handler::transactions_by_day,
        transaction_handler::transactions_by_period,
    ),
    components(
        schemas(
            Transaction,
            MessageResponse,
            TokenResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::PasswordResetRequest,
            transaction_handler::AddTransactionRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and password reset"),
        (name = "Transactions", description = "Per-user transaction log")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /login"))
                        .build(),
                ),
            );
        }
    }
}
