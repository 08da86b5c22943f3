//! Repository for the `claims` table and its `claim_persons` links.

use sqlx::PgPool;

use crate::models::claim::{Claim, ClaimFilter, CreateClaim, UpdateClaim};
use crate::models::person::Person;

use super::page;

const COLUMNS: &str = "cnj, budget_year, origin, principal_status, contractual_fees_status, \
     succumbence_fees_status, face_value, last_update_value, last_update_date, \
     contractual_signed_pct, contractual_separate_pct, succumbence_pct, type_id, created_at, \
     updated_at";

/// Provides CRUD operations for claims and person links.
pub struct ClaimRepo;

impl ClaimRepo {
    /// Insert a new claim. Payment statuses default to `pending`.
    pub async fn create(pool: &PgPool, input: &CreateClaim) -> Result<Claim, sqlx::Error> {
        let query = format!(
            "INSERT INTO claims (cnj, budget_year, origin, principal_status,
                contractual_fees_status, succumbence_fees_status, face_value,
                last_update_value, last_update_date, contractual_signed_pct,
                contractual_separate_pct, succumbence_pct, type_id)
             VALUES ($1, $2, $3, COALESCE($4, 'pending'), COALESCE($5, 'pending'),
                COALESCE($6, 'pending'), $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(&input.cnj)
            .bind(input.budget_year)
            .bind(&input.origin)
            .bind(&input.principal_status)
            .bind(&input.contractual_fees_status)
            .bind(&input.succumbence_fees_status)
            .bind(input.face_value)
            .bind(input.last_update_value)
            .bind(input.last_update_date)
            .bind(input.contractual_signed_pct)
            .bind(input.contractual_separate_pct)
            .bind(input.succumbence_pct)
            .bind(input.type_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_cnj(pool: &PgPool, cnj: &str) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM claims WHERE cnj = $1");
        sqlx::query_as::<_, Claim>(&query)
            .bind(cnj)
            .fetch_optional(pool)
            .await
    }

    /// List claims matching `filter`, newest budget year first.
    pub async fn list(pool: &PgPool, filter: &ClaimFilter) -> Result<Vec<Claim>, sqlx::Error> {
        let (limit, offset) = page(filter.limit, filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM claims
             WHERE ($1::TEXT IS NULL OR origin ILIKE '%' || $1 || '%')
               AND ($2::INT IS NULL OR budget_year = $2)
               AND ($3::TEXT IS NULL OR principal_status = $3)
               AND ($4::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM claim_persons cp
                    WHERE cp.claim_cnj = claims.cnj AND cp.person_cpf = $4))
               AND ($5::BIGINT IS NULL OR type_id = $5)
             ORDER BY budget_year DESC, cnj ASC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(&filter.origin)
            .bind(filter.budget_year)
            .bind(&filter.principal_status)
            .bind(&filter.cpf)
            .bind(filter.type_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a claim. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        cnj: &str,
        input: &UpdateClaim,
    ) -> Result<Option<Claim>, sqlx::Error> {
        let query = format!(
            "UPDATE claims SET
                budget_year = COALESCE($2, budget_year),
                origin = COALESCE($3, origin),
                principal_status = COALESCE($4, principal_status),
                contractual_fees_status = COALESCE($5, contractual_fees_status),
                succumbence_fees_status = COALESCE($6, succumbence_fees_status),
                face_value = COALESCE($7, face_value),
                last_update_value = COALESCE($8, last_update_value),
                last_update_date = COALESCE($9, last_update_date),
                contractual_signed_pct = COALESCE($10, contractual_signed_pct),
                contractual_separate_pct = COALESCE($11, contractual_separate_pct),
                succumbence_pct = COALESCE($12, succumbence_pct),
                type_id = COALESCE($13, type_id)
             WHERE cnj = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(cnj)
            .bind(input.budget_year)
            .bind(&input.origin)
            .bind(&input.principal_status)
            .bind(&input.contractual_fees_status)
            .bind(&input.succumbence_fees_status)
            .bind(input.face_value)
            .bind(input.last_update_value)
            .bind(input.last_update_date)
            .bind(input.contractual_signed_pct)
            .bind(input.contractual_separate_pct)
            .bind(input.succumbence_pct)
            .bind(input.type_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a claim together with its links, documents and requests.
    pub async fn delete(pool: &PgPool, cnj: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM claims WHERE cnj = $1")
            .bind(cnj)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Link a person to a claim. Returns `false` if the link already existed.
    pub async fn link_person(pool: &PgPool, cnj: &str, cpf: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO claim_persons (claim_cnj, person_cpf) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(cnj)
        .bind(cpf)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a person link. Returns `true` if a link was removed.
    pub async fn unlink_person(pool: &PgPool, cnj: &str, cpf: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM claim_persons WHERE claim_cnj = $1 AND person_cpf = $2")
                .bind(cnj)
                .bind(cpf)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `cpf` is linked to the claim.
    pub async fn has_person(pool: &PgPool, cnj: &str, cpf: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM claim_persons WHERE claim_cnj = $1 AND person_cpf = $2
             )",
        )
        .bind(cnj)
        .bind(cpf)
        .fetch_one(pool)
        .await
    }

    /// Persons linked to a claim, ordered by name.
    pub async fn list_persons(pool: &PgPool, cnj: &str) -> Result<Vec<Person>, sqlx::Error> {
        sqlx::query_as::<_, Person>(
            "SELECT p.cpf, p.name, p.birth_date, p.deceased, p.priority, p.notes,
                    p.created_at, p.updated_at
             FROM persons p
             JOIN claim_persons cp ON cp.person_cpf = p.cpf
             WHERE cp.claim_cnj = $1
             ORDER BY p.name ASC, p.cpf ASC",
        )
        .bind(cnj)
        .fetch_all(pool)
        .await
    }
}
