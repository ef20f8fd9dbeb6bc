//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use budget_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct ResetRequest {
///     #[validate(email)]
///     email: String,
/// }
///
/// async fn reset(ValidatedJson(payload): ValidatedJson<ResetRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e.body_text(), "Rejected malformed JSON body");
            AppError::validation(e.body_text())
        })?;

        value.validate().map_err(|e| {
            let message = format_validation_errors(&e);
            tracing::warn!(%message, "Rejected invalid request body");
            AppError::validation(message)
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string
///
/// Fields are reported in name order so the message is stable.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_format_validation_errors() {
        let sample = Sample {
            password: "123".to_string(),
            email: "not-an-email".to_string(),
        };

        let errors = sample.validate().unwrap_err();
        assert_eq!(
            format_validation_errors(&errors),
            "email is invalid, Password must be at least 6 characters"
        );
    }
}
