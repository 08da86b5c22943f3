//! Repository for the `phases` table.

use precatorios_core::color::DEFAULT_PHASE_COLOR;
use precatorios_core::phase::PhaseCategory;
use precatorios_core::types::DbId;
use sqlx::PgPool;

use crate::models::phase::{CreatePhase, Phase, UpdatePhase};

const COLUMNS: &str =
    "id, name, description, color, category, sort_order, active, created_at, updated_at";

/// Provides CRUD operations for the primary phase catalog.
pub struct PhaseRepo;

impl PhaseRepo {
    /// Insert a new phase, returning the created row.
    ///
    /// Omitted fields take their catalog defaults: the grey phase color,
    /// category `both`, sort order 0 and active.
    pub async fn create(pool: &PgPool, input: &CreatePhase) -> Result<Phase, sqlx::Error> {
        let query = format!(
            "INSERT INTO phases (name, description, color, category, sort_order, active)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, $4), COALESCE($5, $6),
                     COALESCE($7, 0), COALESCE($8, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(DEFAULT_PHASE_COLOR)
            .bind(&input.category)
            .bind(PhaseCategory::Both.as_str())
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM phases WHERE id = $1");
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List phases ordered by sort order, category, then name.
    ///
    /// `categories` restricts the result to phases in those categories
    /// (e.g. `["document", "both"]` for phases selectable on a document).
    pub async fn list(
        pool: &PgPool,
        categories: Option<&[&str]>,
        active: Option<bool>,
    ) -> Result<Vec<Phase>, sqlx::Error> {
        let categories: Option<Vec<String>> =
            categories.map(|cs| cs.iter().map(|c| c.to_string()).collect());
        let query = format!(
            "SELECT {COLUMNS} FROM phases
             WHERE ($1::TEXT[] IS NULL OR category = ANY($1))
               AND ($2::BOOL IS NULL OR active = $2)
             ORDER BY sort_order ASC, category ASC, name ASC"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(categories)
            .bind(active)
            .fetch_all(pool)
            .await
    }

    /// Update a phase. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePhase,
    ) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!(
            "UPDATE phases SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                category = COALESCE($5, category),
                sort_order = COALESCE($6, sort_order),
                active = COALESCE($7, active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(&input.category)
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Flip the `active` flag, returning the updated row.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Phase>, sqlx::Error> {
        let query = format!(
            "UPDATE phases SET active = NOT active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Phase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of documents and requests currently in this phase.
    pub async fn usage_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT (SELECT COUNT(*) FROM documents WHERE phase_id = $1)
                  + (SELECT COUNT(*) FROM requests WHERE phase_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a phase. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM phases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
