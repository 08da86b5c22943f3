//! Repository for the `fee_phases` table.

use precatorios_core::color::DEFAULT_FEE_PHASE_COLOR;
use precatorios_core::types::DbId;
use sqlx::PgPool;

use crate::models::fee_phase::{CreateFeePhase, FeePhase, UpdateFeePhase};

const COLUMNS: &str = "id, name, description, color, sort_order, active, created_at, updated_at";

/// Provides CRUD operations for the contractual-fee phase catalog.
pub struct FeePhaseRepo;

impl FeePhaseRepo {
    pub async fn create(pool: &PgPool, input: &CreateFeePhase) -> Result<FeePhase, sqlx::Error> {
        let query = format!(
            "INSERT INTO fee_phases (name, description, color, sort_order, active)
             VALUES ($1, COALESCE($2, ''), COALESCE($3, $4), COALESCE($5, 0), COALESCE($6, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeePhase>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(DEFAULT_FEE_PHASE_COLOR)
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<FeePhase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM fee_phases WHERE id = $1");
        sqlx::query_as::<_, FeePhase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List fee phases ordered by sort order, then name.
    pub async fn list(pool: &PgPool, active: Option<bool>) -> Result<Vec<FeePhase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM fee_phases
             WHERE ($1::BOOL IS NULL OR active = $1)
             ORDER BY sort_order ASC, name ASC"
        );
        sqlx::query_as::<_, FeePhase>(&query)
            .bind(active)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateFeePhase,
    ) -> Result<Option<FeePhase>, sqlx::Error> {
        let query = format!(
            "UPDATE fee_phases SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                sort_order = COALESCE($5, sort_order),
                active = COALESCE($6, active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeePhase>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.color)
            .bind(input.sort_order)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<FeePhase>, sqlx::Error> {
        let query = format!(
            "UPDATE fee_phases SET active = NOT active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FeePhase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of documents currently in this fee phase.
    pub async fn usage_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE fee_phase_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM fee_phases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
