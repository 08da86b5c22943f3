//! Handlers for the `/persons` resource.
//!
//! Persons are addressed by CPF. Path and body CPFs may be formatted
//! (`123.456.789-09`); they are normalized to 11 digits before use.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use precatorios_core::documents::normalize_cpf;
use precatorios_core::error::CoreError;
use precatorios_core::request_kind::RequestKind;
use precatorios_db::models::person::{CreatePerson, Person, PersonFilter, PersonStats, UpdatePerson};
use precatorios_db::models::request::Request;
use precatorios_db::repositories::{PersonRepo, RequestRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Look up a person by (possibly formatted) CPF or fail with `NotFound`.
pub(crate) async fn require_person(state: &AppState, raw_cpf: &str) -> AppResult<Person> {
    let cpf = normalize_cpf(raw_cpf)?;
    let person = PersonRepo::find_by_cpf(&state.pool, &cpf)
        .await?
        .ok_or_else(|| CoreError::not_found("Person", &cpf))?;
    Ok(person)
}

/// POST /api/v1/persons
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreatePerson>,
) -> AppResult<(StatusCode, Json<Person>)> {
    input.name = input.name.trim().to_string();
    input.validate()?;
    input.cpf = normalize_cpf(&input.cpf)?;

    let person = PersonRepo::create(&state.pool, &input).await?;
    tracing::info!(cpf = %person.cpf, "Person created");
    Ok((StatusCode::CREATED, Json(person)))
}

/// GET /api/v1/persons?name=&cpf=&priority=&deceased=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Query(mut filter): Query<PersonFilter>,
) -> AppResult<Json<Vec<Person>>> {
    filter.cpf = filter
        .cpf
        .map(|cpf| cpf.chars().filter(char::is_ascii_digit).collect::<String>())
        .filter(|cpf| !cpf.is_empty());
    let persons = PersonRepo::list(&state.pool, &filter).await?;
    Ok(Json(persons))
}

/// GET /api/v1/persons/stats
pub async fn stats(State(state): State<AppState>) -> AppResult<Json<DataResponse<PersonStats>>> {
    let stats = PersonRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/persons/{cpf}
pub async fn get_by_cpf(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> AppResult<Json<Person>> {
    Ok(Json(require_person(&state, &cpf).await?))
}

/// PUT /api/v1/persons/{cpf}
pub async fn update(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
    Json(mut input): Json<UpdatePerson>,
) -> AppResult<Json<Person>> {
    input.name = input.name.map(|n| n.trim().to_string());
    input.validate()?;
    let cpf = normalize_cpf(&cpf)?;

    let person = PersonRepo::update(&state.pool, &cpf, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Person", &cpf))?;
    Ok(Json(person))
}

/// DELETE /api/v1/persons/{cpf}
///
/// Refused with 409 while the person is linked to a claim or referenced by
/// a document, request or task.
pub async fn delete(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> AppResult<StatusCode> {
    let cpf = normalize_cpf(&cpf)?;

    let references = PersonRepo::count_references(&state.pool, &cpf).await?;
    if references > 0 {
        return Err(CoreError::Conflict(format!(
            "Person {cpf} is referenced by {references} claim links, documents, requests or tasks"
        ))
        .into());
    }

    if PersonRepo::delete(&state.pool, &cpf).await? {
        tracing::info!(%cpf, "Person deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::not_found("Person", &cpf).into())
    }
}

/// GET /api/v1/persons/{cpf}/priority-requests
///
/// Priority requests (illness or age) filed for the person, newest first.
pub async fn priority_requests(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> AppResult<Json<Vec<Request>>> {
    let person = require_person(&state, &cpf).await?;
    let requests =
        RequestRepo::list_for_person(&state.pool, &person.cpf, &RequestKind::priority_values())
            .await?;
    Ok(Json(requests))
}
