//! Follow-up task (diligência) model and DTOs.

use precatorios_core::task;
use precatorios_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub person_cpf: String,
    pub task_type_id: DbId,
    pub due_date: Date,
    /// `low`, `medium` or `high`.
    pub urgency: String,
    pub created_by: String,
    pub description: Option<String>,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub completed_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn is_overdue(&self, today: Date) -> bool {
        task::is_overdue(self.completed, self.due_date, today)
    }

    pub fn days_until_deadline(&self, today: Date) -> Option<i64> {
        task::days_until_deadline(self.completed, self.due_date, today)
    }
}

/// DTO for creating a task. `created_by` is filled from the acting user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    pub person_cpf: String,
    pub task_type_id: DbId,
    pub due_date: Date,
    pub urgency: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTask {
    pub task_type_id: Option<DbId>,
    pub due_date: Option<Date>,
    pub urgency: Option<String>,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
}

/// Query filters for listing tasks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub person_cpf: Option<String>,
    pub task_type_id: Option<DbId>,
    pub completed: Option<bool>,
    pub urgency: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
