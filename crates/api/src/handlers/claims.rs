//! Handlers for the `/claims` resource and its person links.
//!
//! Claims are addressed by CNJ number:
//! `/claims/{cnj}` and `/claims/{cnj}/persons[/{cpf}]`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::claim::{validate_amount, validate_budget_year, validate_percentage, PaymentStatus};
use precatorios_core::documents::{normalize_cpf, validate_cnj};
use precatorios_core::error::CoreError;
use precatorios_db::models::claim::{Claim, ClaimFilter, CreateClaim, LinkPerson, UpdateClaim};
use precatorios_db::models::person::Person;
use precatorios_db::repositories::ClaimRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::claim_types::require_assignable;
use crate::handlers::persons::require_person;
use crate::state::AppState;

/// Look up a claim by CNJ or fail with `NotFound`.
pub(crate) async fn require_claim(state: &AppState, cnj: &str) -> AppResult<Claim> {
    let cnj = cnj.trim();
    let claim = ClaimRepo::find_by_cnj(&state.pool, cnj)
        .await?
        .ok_or_else(|| CoreError::not_found("Claim", cnj))?;
    Ok(claim)
}

struct ClaimFields<'a> {
    budget_year: Option<i32>,
    statuses: [Option<&'a str>; 3],
    amounts: [(&'static str, Option<f64>); 2],
    percentages: [(&'static str, Option<f64>); 3],
}

fn check_fields(fields: ClaimFields<'_>) -> Result<(), CoreError> {
    if let Some(year) = fields.budget_year {
        validate_budget_year(year)?;
    }
    for status in fields.statuses.into_iter().flatten() {
        PaymentStatus::parse(status)?;
    }
    for (field, amount) in fields.amounts {
        if let Some(amount) = amount {
            validate_amount(field, amount)?;
        }
    }
    for (field, pct) in fields.percentages {
        validate_percentage(field, pct)?;
    }
    Ok(())
}

/// POST /api/v1/claims
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateClaim>,
) -> AppResult<(StatusCode, Json<Claim>)> {
    input.validate()?;
    input.cnj = validate_cnj(&input.cnj)?;
    check_fields(ClaimFields {
        budget_year: Some(input.budget_year),
        statuses: [
            input.principal_status.as_deref(),
            input.contractual_fees_status.as_deref(),
            input.succumbence_fees_status.as_deref(),
        ],
        amounts: [
            ("face_value", Some(input.face_value)),
            ("last_update_value", input.last_update_value),
        ],
        percentages: [
            ("contractual_signed_pct", input.contractual_signed_pct),
            ("contractual_separate_pct", input.contractual_separate_pct),
            ("succumbence_pct", input.succumbence_pct),
        ],
    })?;

    if let Some(type_id) = input.type_id {
        require_assignable(&state, type_id).await?;
    }

    let claim = ClaimRepo::create(&state.pool, &input).await?;
    tracing::info!(cnj = %claim.cnj, "Claim created");
    Ok((StatusCode::CREATED, Json(claim)))
}

/// GET /api/v1/claims?origin=&budget_year=&principal_status=&type_id=&cpf=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<ClaimFilter>,
) -> AppResult<Json<Vec<Claim>>> {
    if let Some(cpf) = filter.cpf.as_deref() {
        filter.cpf = Some(normalize_cpf(cpf)?);
    }
    let claims = ClaimRepo::list(&state.pool, &filter).await?;
    Ok(Json(claims))
}

/// GET /api/v1/claims/{cnj}
pub async fn get_by_cnj(
    State(state): State<AppState>,
    Path(cnj): Path<String>,
) -> AppResult<Json<Claim>> {
    Ok(Json(require_claim(&state, &cnj).await?))
}

/// PUT /api/v1/claims/{cnj}
pub async fn update(
    State(state): State<AppState>,
    Path(cnj): Path<String>,
    Json(input): Json<UpdateClaim>,
) -> AppResult<Json<Claim>> {
    input.validate()?;
    check_fields(ClaimFields {
        budget_year: input.budget_year,
        statuses: [
            input.principal_status.as_deref(),
            input.contractual_fees_status.as_deref(),
            input.succumbence_fees_status.as_deref(),
        ],
        amounts: [
            ("face_value", input.face_value),
            ("last_update_value", input.last_update_value),
        ],
        percentages: [
            ("contractual_signed_pct", input.contractual_signed_pct),
            ("contractual_separate_pct", input.contractual_separate_pct),
            ("succumbence_pct", input.succumbence_pct),
        ],
    })?;
    if let Some(type_id) = input.type_id {
        require_assignable(&state, type_id).await?;
    }

    let cnj = cnj.trim();
    let claim = ClaimRepo::update(&state.pool, cnj, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Claim", cnj))?;
    Ok(Json(claim))
}

/// DELETE /api/v1/claims/{cnj}
///
/// Removes the claim along with its person links, documents and requests.
pub async fn delete(
    State(state): State<AppState>,
    Path(cnj): Path<String>,
) -> AppResult<StatusCode> {
    let cnj = cnj.trim();
    if ClaimRepo::delete(&state.pool, cnj).await? {
        tracing::info!(%cnj, "Claim deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Claim", cnj).into())
    }
}

// ---------------------------------------------------------------------------
// Person links
// ---------------------------------------------------------------------------

/// GET /api/v1/claims/{cnj}/persons
pub async fn list_persons(
    State(state): State<AppState>,
    Path(cnj): Path<String>,
) -> AppResult<Json<Vec<Person>>> {
    let claim = require_claim(&state, &cnj).await?;
    let persons = ClaimRepo::list_persons(&state.pool, &claim.cnj).await?;
    Ok(Json(persons))
}

/// POST /api/v1/claims/{cnj}/persons
///
/// Returns 201 when a new link is made and 200 when it already existed.
pub async fn link_person(
    State(state): State<AppState>,
    Path(cnj): Path<String>,
    Json(input): Json<LinkPerson>,
) -> AppResult<(StatusCode, Json<Person>)> {
    let claim = require_claim(&state, &cnj).await?;
    let person = require_person(&state, &input.cpf).await?;

    let created = ClaimRepo::link_person(&state.pool, &claim.cnj, &person.cpf).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(person)))
}

/// DELETE /api/v1/claims/{cnj}/persons/{cpf}
pub async fn unlink_person(
    State(state): State<AppState>,
    Path((cnj, cpf)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let cnj = cnj.trim();
    let cpf = normalize_cpf(&cpf)?;
    if ClaimRepo::unlink_person(&state.pool, cnj, &cpf).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("ClaimPerson", format!("{cnj}/{cpf}")).into())
    }
}
