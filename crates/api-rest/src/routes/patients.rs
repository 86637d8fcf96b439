use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use mcg_core::RecordId;

use crate::error::{ApiError, ErrorBody};
use crate::schemas::{PatientRecordRes, PatientReq, PatientRes, SearchParams};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient created", body = PatientRes),
        (status = 400, description = "Invalid patient fields", body = ErrorBody),
        (status = 409, description = "External identifier already in use", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Create a patient
///
/// # Errors
/// Returns `409 Conflict` if another patient already holds the external identifier.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<PatientReq>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let patient = state.patients.create_patient(req.into())?;
    Ok((StatusCode::CREATED, Json(patient.into())))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    tag = "patients",
    params(("id" = u64, Path, description = "Patient id")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 400, description = "Invalid fields or unknown patient", body = ErrorBody),
        (status = 409, description = "External identifier belongs to another patient", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Replace a patient's fields
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(req): Json<PatientReq>,
) -> Result<Json<PatientRes>, ApiError> {
    let patient = state.patients.update_patient(id, req.into())?;
    Ok(Json(patient.into()))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    tag = "patients",
    params(("id" = u64, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient and everything it owns deleted"),
        (status = 400, description = "Unknown patient", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Delete a patient together with its attachments and diagnosed conditions
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.patients.delete_patient(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching patients with their records", body = [PatientRecordRes])
    ),
    security(("bearer" = []))
)]
/// Search patients
///
/// A patient is returned when any supplied criterion matches exactly. With no criteria the
/// result is empty.
#[axum::debug_handler]
pub async fn search_patients(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PatientRecordRes>>, ApiError> {
    let records = state.patients.search_patients(&params.into())?;
    Ok(Json(records.into_iter().map(PatientRecordRes::from).collect()))
}
