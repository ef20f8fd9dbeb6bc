//! Transaction domain entity and date handling.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::DATE_FORMAT;
use crate::errors::{AppError, AppResult};

/// A dated entry in a user's budget
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Transaction {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(value_type = String, example = "2024-01-05")]
    pub date: NaiveDate,
    #[schema(example = "Coffee")]
    pub name: String,
    #[schema(example = "Food")]
    pub category: String,
    #[schema(example = 3.5)]
    pub amount: f64,
}

/// Validated transaction data, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    pub amount: f64,
}

impl NewTransaction {
    /// Validate raw input into a transaction ready for storage.
    ///
    /// # Errors
    /// Validation error when the date is not `YYYY-MM-DD` or the amount
    /// is not a finite number greater than zero.
    pub fn new(date: &str, name: String, category: String, amount: f64) -> AppResult<Self> {
        let date = parse_date(date).ok_or_else(|| {
            AppError::validation("Invalid date format (expected YYYY-MM-DD)")
        })?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation("Amount must be greater than 0"));
        }

        Ok(Self {
            date,
            name,
            category,
            amount,
        })
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// Both separators and all eight digits must be present, so `2024-1-5`
/// and `2024-01-05T00:00` are rejected along with impossible dates.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return None;
    }

    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

/// Parse a named date parameter, producing the validation error callers see.
pub fn parse_date_param(field: &str, input: &str) -> AppResult<NaiveDate> {
    parse_date(input).ok_or_else(|| {
        AppError::validation(format!("Invalid {} format (expected YYYY-MM-DD)", field))
    })
}
