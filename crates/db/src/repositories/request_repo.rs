//! Repository for the `requests` table.
//!
//! As with documents, `update` leaves the phase column to
//! [`PhaseAuditRepo`](super::PhaseAuditRepo) and `create` takes the initial
//! phase already stamped.

use precatorios_core::phase_audit::TrackedPhase;
use precatorios_core::types::DbId;
use sqlx::PgPool;

use crate::models::request::{CreateRequest, Request, RequestFilter, UpdateRequest};

use super::page;

const COLUMNS: &str = "id, claim_cnj, person_cpf, kind, amount, discount_rate, phase_id, \
     phase_changed_at, phase_changed_by, created_at, updated_at";

pub struct RequestRepo;

impl RequestRepo {
    /// Insert a new request together with its initial phase.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRequest,
        phase: &TrackedPhase,
    ) -> Result<Request, sqlx::Error> {
        let query = format!(
            "INSERT INTO requests (claim_cnj, person_cpf, kind, amount, discount_rate,
                phase_id, phase_changed_at, phase_changed_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(&input.claim_cnj)
            .bind(&input.person_cpf)
            .bind(&input.kind)
            .bind(input.amount)
            .bind(input.discount_rate)
            .bind(phase.phase_id)
            .bind(phase.audit.changed_at)
            .bind(phase.audit.changed_by.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Request>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requests WHERE id = $1");
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &RequestFilter) -> Result<Vec<Request>, sqlx::Error> {
        let (limit, offset) = page(filter.limit, filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE ($1::TEXT IS NULL OR claim_cnj = $1)
               AND ($2::TEXT IS NULL OR person_cpf = $2)
               AND ($3::TEXT IS NULL OR kind = $3)
               AND ($4::BIGINT IS NULL OR phase_id = $4)
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(&filter.claim_cnj)
            .bind(&filter.person_cpf)
            .bind(&filter.kind)
            .bind(filter.phase_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Requests of the given kinds filed for a person, newest first.
    pub async fn list_for_person(
        pool: &PgPool,
        cpf: &str,
        kinds: &[&str],
    ) -> Result<Vec<Request>, sqlx::Error> {
        let kinds: Vec<String> = kinds.iter().map(|k| k.to_string()).collect();
        let query = format!(
            "SELECT {COLUMNS} FROM requests
             WHERE person_cpf = $1 AND kind = ANY($2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(cpf)
            .bind(&kinds)
            .fetch_all(pool)
            .await
    }

    /// Update non-phase fields. The phase and its audit pair are untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRequest,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET
                kind = COALESCE($2, kind),
                amount = COALESCE($3, amount),
                discount_rate = COALESCE($4, discount_rate)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(input.amount)
            .bind(input.discount_rate)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
