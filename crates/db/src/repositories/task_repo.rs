//! Repository for the `tasks` table.

use precatorios_core::task::Urgency;
use precatorios_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

use super::page;

const COLUMNS: &str = "id, person_cpf, task_type_id, due_date, urgency, created_by, description, \
     completed, completed_at, completed_by, created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new open task attributed to `created_by`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        created_by: &str,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (person_cpf, task_type_id, due_date, urgency, created_by, description)
             VALUES ($1, $2, $3, COALESCE($4, $5), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.person_cpf)
            .bind(input.task_type_id)
            .bind(input.due_date)
            .bind(&input.urgency)
            .bind(Urgency::default().as_str())
            .bind(created_by)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks matching `filter`: open tasks first, then by due date.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let (limit, offset) = page(filter.limit, filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::TEXT IS NULL OR person_cpf = $1)
               AND ($2::BIGINT IS NULL OR task_type_id = $2)
               AND ($3::BOOL IS NULL OR completed = $3)
               AND ($4::TEXT IS NULL OR urgency = $4)
             ORDER BY completed ASC, due_date ASC, id ASC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&filter.person_cpf)
            .bind(filter.task_type_id)
            .bind(filter.completed)
            .bind(&filter.urgency)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                task_type_id = COALESCE($2, task_type_id),
                due_date = COALESCE($3, due_date),
                urgency = COALESCE($4, urgency),
                description = COALESCE($5, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(input.task_type_id)
            .bind(input.due_date)
            .bind(&input.urgency)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Mark a task completed by `actor` at `at`.
    ///
    /// Completing an already-completed task keeps the original completion
    /// stamp.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        actor: &str,
        at: Timestamp,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                completed_at = CASE WHEN completed THEN completed_at ELSE $3 END,
                completed_by = CASE WHEN completed THEN completed_by ELSE $2 END,
                completed = TRUE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(actor)
            .bind(at)
            .fetch_optional(pool)
            .await
    }

    /// Reopen a task, clearing its completion stamp.
    pub async fn reopen(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET completed = FALSE, completed_at = NULL, completed_by = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
