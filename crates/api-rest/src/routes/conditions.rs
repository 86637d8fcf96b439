use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use mcg_core::RecordId;

use crate::error::{ApiError, ErrorBody};
use crate::schemas::{DiagnosedConditionReq, DiagnosedConditionRes};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/patients/{id}/diagnosedConditions",
    tag = "diagnosedConditions",
    params(("id" = u64, Path, description = "Owning patient id")),
    request_body = DiagnosedConditionReq,
    responses(
        (status = 201, description = "Diagnosed condition recorded", body = DiagnosedConditionRes),
        (status = 400, description = "Invalid fields or unknown patient", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Record a diagnosed condition for a patient
#[axum::debug_handler]
pub async fn add_diagnosed_condition(
    State(state): State<AppState>,
    Path(patient_id): Path<RecordId>,
    Json(req): Json<DiagnosedConditionReq>,
) -> Result<(StatusCode, Json<DiagnosedConditionRes>), ApiError> {
    let condition = state
        .conditions
        .add_diagnosed_condition_to_patient(patient_id, req.into())?;
    Ok((StatusCode::CREATED, Json(condition.into())))
}

#[utoipa::path(
    delete,
    path = "/diagnosedConditions/{id}",
    tag = "diagnosedConditions",
    params(("id" = u64, Path, description = "Diagnosed condition id")),
    responses(
        (status = 204, description = "Diagnosed condition deleted"),
        (status = 400, description = "Unknown diagnosed condition", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Delete a diagnosed condition
#[axum::debug_handler]
pub async fn delete_diagnosed_condition(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.conditions.delete_diagnosed_condition(id)?;
    Ok(StatusCode::NO_CONTENT)
}
