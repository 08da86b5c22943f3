//! Repository for the `persons` table.

use precatorios_core::types::Date;
use sqlx::PgPool;

use crate::models::person::{CreatePerson, Person, PersonFilter, PersonStats, UpdatePerson};

use super::page;

const COLUMNS: &str = "cpf, name, birth_date, deceased, priority, notes, created_at, updated_at";

/// Provides CRUD operations for persons plus the priority reconciliation
/// queries.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a new person, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePerson) -> Result<Person, sqlx::Error> {
        let query = format!(
            "INSERT INTO persons (cpf, name, birth_date, deceased, priority, notes)
             VALUES ($1, $2, $3, COALESCE($4, FALSE), COALESCE($5, FALSE), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&input.cpf)
            .bind(&input.name)
            .bind(input.birth_date)
            .bind(input.deceased)
            .bind(input.priority)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_cpf(pool: &PgPool, cpf: &str) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE cpf = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(cpf)
            .fetch_optional(pool)
            .await
    }

    /// List persons matching `filter`, ordered by name.
    pub async fn list(pool: &PgPool, filter: &PersonFilter) -> Result<Vec<Person>, sqlx::Error> {
        let (limit, offset) = page(filter.limit, filter.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM persons
             WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
               AND ($2::TEXT IS NULL OR cpf LIKE '%' || $2 || '%')
               AND ($3::BOOL IS NULL OR priority = $3)
               AND ($4::BOOL IS NULL OR deceased = $4)
             ORDER BY name ASC, cpf ASC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(&filter.name)
            .bind(&filter.cpf)
            .bind(filter.priority)
            .bind(filter.deceased)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a person. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no person with the given CPF exists.
    pub async fn update(
        pool: &PgPool,
        cpf: &str,
        input: &UpdatePerson,
    ) -> Result<Option<Person>, sqlx::Error> {
        let query = format!(
            "UPDATE persons SET
                name = COALESCE($2, name),
                birth_date = COALESCE($3, birth_date),
                deceased = COALESCE($4, deceased),
                priority = COALESCE($5, priority),
                notes = COALESCE($6, notes)
             WHERE cpf = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(cpf)
            .bind(&input.name)
            .bind(input.birth_date)
            .bind(input.deceased)
            .bind(input.priority)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a person. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign key violation if the person is still referenced;
    /// callers check [`PersonRepo::count_references`] first for a clearer
    /// error.
    pub async fn delete(pool: &PgPool, cpf: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM persons WHERE cpf = $1")
            .bind(cpf)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of claim links, documents, requests and tasks referencing a person.
    pub async fn count_references(pool: &PgPool, cpf: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT (SELECT COUNT(*) FROM claim_persons WHERE person_cpf = $1)
                  + (SELECT COUNT(*) FROM documents WHERE person_cpf = $1)
                  + (SELECT COUNT(*) FROM requests WHERE person_cpf = $1)
                  + (SELECT COUNT(*) FROM tasks WHERE person_cpf = $1)",
        )
        .bind(cpf)
        .fetch_one(pool)
        .await
    }

    pub async fn stats(pool: &PgPool) -> Result<PersonStats, sqlx::Error> {
        sqlx::query_as::<_, PersonStats>(
            "SELECT COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE priority) AS with_priority,
                    COUNT(*) FILTER (WHERE NOT priority) AS without_priority,
                    COUNT(*) FILTER (WHERE deceased) AS deceased
             FROM persons",
        )
        .fetch_one(pool)
        .await
    }

    /// Living persons without priority born strictly before `cutoff`.
    ///
    /// `None` means no cutoff: every living non-priority person with a
    /// known birth date qualifies.
    pub async fn promotion_candidates(
        pool: &PgPool,
        cutoff: Option<Date>,
    ) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM persons
             WHERE deceased = FALSE
               AND priority = FALSE
               AND birth_date IS NOT NULL
               AND ($1::DATE IS NULL OR birth_date < $1)
             ORDER BY cpf ASC"
        );
        sqlx::query_as::<_, Person>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Deceased persons that still carry priority.
    pub async fn demotion_candidates(pool: &PgPool) -> Result<Vec<Person>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM persons
             WHERE deceased = TRUE AND priority = TRUE
             ORDER BY cpf ASC"
        );
        sqlx::query_as::<_, Person>(&query).fetch_all(pool).await
    }

    /// Grant priority to every listed person still eligible under `cutoff`.
    ///
    /// The promotion predicate is repeated in the `WHERE` clause so a row
    /// that died or lost its birth date since it was selected stays put.
    /// `None` means no cutoff, as in [`Self::promotion_candidates`].
    pub async fn promote(
        pool: &PgPool,
        cpfs: &[String],
        cutoff: Option<Date>,
    ) -> Result<u64, sqlx::Error> {
        if cpfs.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE persons SET priority = TRUE
             WHERE cpf = ANY($1)
               AND priority = FALSE
               AND deceased = FALSE
               AND birth_date IS NOT NULL
               AND ($2::DATE IS NULL OR birth_date < $2)",
        )
        .bind(cpfs)
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Revoke priority from every listed person that is still deceased.
    pub async fn demote(pool: &PgPool, cpfs: &[String]) -> Result<u64, sqlx::Error> {
        if cpfs.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "UPDATE persons SET priority = FALSE
             WHERE cpf = ANY($1) AND priority = TRUE AND deceased = TRUE",
        )
        .bind(cpfs)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
