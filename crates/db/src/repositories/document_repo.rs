//! Repository for the `documents` table.
//!
//! `update` never touches phase columns; later phase changes go through
//! [`PhaseAuditRepo`](super::PhaseAuditRepo). `create` takes the initial
//! phases already stamped so the row and its audit pairs land together.

use precatorios_core::phase_audit::TrackedPhase;
use precatorios_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, DocumentFilter, UpdateDocument};

use super::page;

const COLUMNS: &str = "id, claim_cnj, person_cpf, kind, principal_value, contractual_fees, \
     succumbence_fees, phase_id, phase_changed_at, phase_changed_by, fee_phase_id, \
     fee_phase_changed_at, fee_phase_changed_by, created_at, updated_at";

pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a new document together with its initial phases.
    ///
    /// The phase ids in `input` are ignored in favour of `phase` and
    /// `fee_phase`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDocument,
        phase: &TrackedPhase,
        fee_phase: &TrackedPhase,
    ) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (claim_cnj, person_cpf, kind, principal_value,
                contractual_fees, succumbence_fees, phase_id, phase_changed_at,
                phase_changed_by, fee_phase_id, fee_phase_changed_at, fee_phase_changed_by)
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, 0),
                $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.claim_cnj)
            .bind(&input.person_cpf)
            .bind(&input.kind)
            .bind(input.principal_value)
            .bind(input.contractual_fees)
            .bind(input.succumbence_fees)
            .bind(phase.phase_id)
            .bind(phase.audit.changed_at)
            .bind(phase.audit.changed_by.as_deref())
            .bind(fee_phase.phase_id)
            .bind(fee_phase.audit.changed_at)
            .bind(fee_phase.audit.changed_by.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List documents matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &DocumentFilter,
    ) -> Result<Vec<Document>, sqlx::Error> {
        let (limit, offset) = page(filter.limit, filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE ($1::TEXT IS NULL OR claim_cnj = $1)
               AND ($2::TEXT IS NULL OR person_cpf = $2)
               AND ($3::BIGINT IS NULL OR phase_id = $3)
               AND ($4::BIGINT IS NULL OR fee_phase_id = $4)
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&filter.claim_cnj)
            .bind(&filter.person_cpf)
            .bind(filter.phase_id)
            .bind(filter.fee_phase_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update non-phase fields. Phase values and audit pairs are untouched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET
                kind = COALESCE($2, kind),
                principal_value = COALESCE($3, principal_value),
                contractual_fees = COALESCE($4, contractual_fees),
                succumbence_fees = COALESCE($5, succumbence_fees)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(input.principal_value)
            .bind(input.contractual_fees)
            .bind(input.succumbence_fees)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
