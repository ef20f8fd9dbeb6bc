//! Transaction handlers. All routes here sit behind the auth middleware.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::Transaction;
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// New transaction request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddTransactionRequest {
    /// Calendar date, `YYYY-MM-DD`
    #[schema(example = "2024-01-05")]
    pub date: String,
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Coffee")]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Category must be 1-50 characters"))]
    #[schema(example = "Food")]
    pub category: String,
    /// Must be greater than 0
    #[schema(example = 3.5)]
    pub amount: f64,
}

/// Inclusive date range
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// First day of the range, `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// Last day of the range, `YYYY-MM-DD`
    pub end_date: Option<String>,
}

/// Create transaction routes
pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(add_transaction))
        .route("/transactions/day/:date", get(transactions_by_day))
        .route("/transactions/period", get(transactions_by_period))
}

/// Record a transaction for the authenticated user
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    request_body = AddTransactionRequest,
    responses(
        (status = 200, description = "Transaction added", body = MessageResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn add_transaction(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddTransactionRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .transaction_service
        .add_transaction(
            current_user.id,
            &payload.date,
            payload.name,
            payload.category,
            payload.amount,
        )
        .await?;

    Ok(Json(MessageResponse::new("Transaction added")))
}

/// List the authenticated user's transactions for one day
#[utoipa::path(
    get,
    path = "/api/transactions/day/{date}",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(("date" = String, Path, description = "Day to list, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Transactions on that day", body = [Transaction]),
        (status = 400, description = "Invalid date"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn transactions_by_day(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<Vec<Transaction>>> {
    let transactions = state
        .transaction_service
        .transactions_by_day(current_user.id, &date)
        .await?;

    Ok(Json(transactions))
}

/// List the authenticated user's transactions within a date range
#[utoipa::path(
    get,
    path = "/api/transactions/period",
    tag = "Transactions",
    security(("bearer_auth" = [])),
    params(PeriodQuery),
    responses(
        (status = 200, description = "Transactions in the range, bounds included", body = [Transaction]),
        (status = 400, description = "Missing or invalid date"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn transactions_by_period(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<Vec<Transaction>>> {
    let transactions = state
        .transaction_service
        .transactions_by_period(
            current_user.id,
            period.start_date.as_deref().unwrap_or_default(),
            period.end_date.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(transactions))
}
