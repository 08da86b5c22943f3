//! Fixtures shared by the database integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use precatorios_core::phase_audit::TrackedPhase;
use precatorios_core::types::Date;
use precatorios_db::models::claim::CreateClaim;
use precatorios_db::models::document::{CreateDocument, Document};
use precatorios_db::models::person::{CreatePerson, Person};
use precatorios_db::models::phase::{CreatePhase, Phase};
use precatorios_db::models::request::{CreateRequest, Request};
use precatorios_db::repositories::{ClaimRepo, DocumentRepo, PersonRepo, PhaseRepo, RequestRepo};
use sqlx::PgPool;

pub const CNJ: &str = "1234567-89.2023.8.26.0100";

pub fn date(y: i32, m: u32, d: u32) -> Date {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn new_person(cpf: &str, name: &str, born: Option<Date>) -> CreatePerson {
    CreatePerson {
        cpf: cpf.to_string(),
        name: name.to_string(),
        birth_date: born,
        deceased: None,
        priority: None,
        notes: None,
    }
}

pub async fn seed_person(
    pool: &PgPool,
    cpf: &str,
    name: &str,
    born: Option<Date>,
    deceased: bool,
    priority: bool,
) -> Person {
    let input = CreatePerson {
        deceased: Some(deceased),
        priority: Some(priority),
        ..new_person(cpf, name, born)
    };
    PersonRepo::create(pool, &input).await.unwrap()
}

pub fn new_claim(cnj: &str) -> CreateClaim {
    CreateClaim {
        cnj: cnj.to_string(),
        budget_year: 2024,
        origin: "TJSP - 1ª Vara da Fazenda Pública".to_string(),
        principal_status: None,
        contractual_fees_status: None,
        succumbence_fees_status: None,
        face_value: 150_000.0,
        last_update_value: None,
        last_update_date: None,
        contractual_signed_pct: Some(30.0),
        contractual_separate_pct: None,
        succumbence_pct: None,
        type_id: None,
    }
}

pub fn new_phase(name: &str, category: &str) -> CreatePhase {
    CreatePhase {
        name: name.to_string(),
        description: None,
        color: None,
        category: Some(category.to_string()),
        sort_order: None,
        active: None,
    }
}

pub async fn seed_phase(pool: &PgPool, name: &str, category: &str) -> Phase {
    PhaseRepo::create(pool, &new_phase(name, category)).await.unwrap()
}

/// Claim `CNJ` with one linked person, returned as that person's CPF.
pub async fn seed_claim_with_person(pool: &PgPool, cpf: &str) -> String {
    seed_person(pool, cpf, "Maria da Silva", Some(date(1950, 3, 1)), false, false).await;
    if ClaimRepo::find_by_cnj(pool, CNJ).await.unwrap().is_none() {
        ClaimRepo::create(pool, &new_claim(CNJ)).await.unwrap();
    }
    ClaimRepo::link_person(pool, CNJ, cpf).await.unwrap();
    cpf.to_string()
}

pub async fn seed_document(pool: &PgPool, cpf: &str) -> Document {
    let input = CreateDocument {
        claim_cnj: CNJ.to_string(),
        person_cpf: cpf.to_string(),
        kind: "Prioridade".to_string(),
        principal_value: 42_000.0,
        contractual_fees: None,
        succumbence_fees: None,
        phase_id: None,
        fee_phase_id: None,
    };
    DocumentRepo::create(pool, &input, &TrackedPhase::default(), &TrackedPhase::default())
        .await
        .unwrap()
}

pub async fn seed_request(pool: &PgPool, cpf: &str, kind: &str) -> Request {
    let input = CreateRequest {
        claim_cnj: CNJ.to_string(),
        person_cpf: cpf.to_string(),
        kind: kind.to_string(),
        amount: 10_000.0,
        discount_rate: 0.0,
        phase_id: None,
    };
    RequestRepo::create(pool, &input, &TrackedPhase::default())
        .await
        .unwrap()
}
