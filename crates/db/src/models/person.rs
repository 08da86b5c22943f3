//! Person entity model and DTOs.

use precatorios_core::priority::PersonRecord;
use precatorios_core::types::{Date, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `persons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Person {
    /// Normalized 11-digit CPF.
    pub cpf: String,
    pub name: String,
    pub birth_date: Option<Date>,
    pub deceased: bool,
    pub priority: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Person> for PersonRecord {
    fn from(person: Person) -> Self {
        PersonRecord {
            cpf: person.cpf,
            name: person.name,
            birth_date: person.birth_date,
            deceased: person.deceased,
            priority: person.priority,
        }
    }
}

/// DTO for creating a person. `cpf` is normalized by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePerson {
    pub cpf: String,
    #[validate(length(min = 1, max = 400))]
    pub name: String,
    pub birth_date: Option<Date>,
    pub deceased: Option<bool>,
    pub priority: Option<bool>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// DTO for updating a person. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePerson {
    #[validate(length(min = 1, max = 400))]
    pub name: Option<String>,
    pub birth_date: Option<Date>,
    pub deceased: Option<bool>,
    pub priority: Option<bool>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

/// Query filters for listing persons.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Digits-only prefix of the CPF.
    pub cpf: Option<String>,
    pub priority: Option<bool>,
    pub deceased: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate counts over all persons.
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct PersonStats {
    pub total: i64,
    pub with_priority: i64,
    pub without_priority: i64,
    pub deceased: i64,
}
