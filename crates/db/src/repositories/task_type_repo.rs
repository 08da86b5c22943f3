//! Repository for the `task_types` table.

use precatorios_core::color::DEFAULT_TASK_TYPE_COLOR;
use precatorios_core::types::DbId;
use sqlx::PgPool;

use crate::models::task_type::{CreateTaskType, TaskType, UpdateTaskType};

const COLUMNS: &str = "id, name, description, color, sort_order, active, created_at, updated_at";

pub struct TaskTypeRepo;

impl TaskTypeRepo {
    pub async fn create(pool: &PgPool, input: &CreateTaskType) -> Result<TaskType, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_types (name, description, color, sort_order, active)
             VALUES ($1, $2, COALESCE($3, $4), COALESCE($5, 0), COALESCE($6, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskType>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(DEFAULT_TASK_TYPE_COLOR)
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaskType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_types WHERE id = $1");
        sqlx::query_as::<_, TaskType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, active: Option<bool>) -> Result<Vec<TaskType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_types
             WHERE ($1::BOOL IS NULL OR active = $1)
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, TaskType>(&query)
            .bind(active)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTaskType,
    ) -> Result<Option<TaskType>, sqlx::Error> {
        let query = format!(
            "UPDATE task_types SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                sort_order = COALESCE($5, sort_order),
                active = COALESCE($6, active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskType>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Number of tasks of this type.
    pub async fn usage_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE task_type_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
