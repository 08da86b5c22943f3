//! Claim (precatório) field rules.

use serde::{Deserialize, Serialize};

use crate::documents::{MAX_CASE_YEAR, MIN_CASE_YEAR};
use crate::error::CoreError;

/// Payment status of one component of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Sold,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 4] = [
        PaymentStatus::Pending,
        PaymentStatus::Partial,
        PaymentStatus::Paid,
        PaymentStatus::Sold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Sold => "sold",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid payment status '{value}'. Must be one of: pending, partial, paid, sold"
                ))
            })
    }
}

/// Validate a budget year.
pub fn validate_budget_year(year: i32) -> Result<(), CoreError> {
    if (MIN_CASE_YEAR..=MAX_CASE_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Budget year must be between {MIN_CASE_YEAR} and {MAX_CASE_YEAR}"
        )))
    }
}

/// Validate a monetary amount: finite and non-negative.
pub fn validate_amount(field: &str, value: f64) -> Result<(), CoreError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "{field} must be a non-negative amount"
        )))
    }
}

/// Validate an optional percentage in `0..=100`.
pub fn validate_percentage(field: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(CoreError::Validation(format!(
            "{field} must be between 0 and 100"
        ))),
        _ => Ok(()),
    }
}
