//! Follow-up task (diligência) deadline rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// How pressing a task is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Urgency::Low, Urgency::Medium, Urgency::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Medium => "medium",
            Urgency::High => "high",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid urgency '{value}'. Must be one of: low, medium, high"
                ))
            })
    }
}

/// A task is overdue when it is still open and its due date has passed.
pub fn is_overdue(completed: bool, due_date: Date, today: Date) -> bool {
    !completed && due_date < today
}

/// Days left until the due date (negative when overdue). `None` once
/// completed.
pub fn days_until_deadline(completed: bool, due_date: Date, today: Date) -> Option<i64> {
    if completed {
        None
    } else {
        Some((due_date - today).num_days())
    }
}
