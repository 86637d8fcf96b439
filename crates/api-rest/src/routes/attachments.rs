use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};

use mcg_core::{NewAttachment, RecordId};

use crate::error::{ApiError, ErrorBody};
use crate::schemas::{AttachmentForm, AttachmentRes};
use crate::AppState;

/// Reads the upload form. Unknown fields are ignored; missing ones stay empty and are caught by
/// domain validation.
async fn read_form(mut multipart: Multipart) -> Result<NewAttachment, ApiError> {
    let mut new = NewAttachment::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "data" => {
                new.data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read data: {e}")))?
                    .to_vec();
            }
            "name" | "description" | "type" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read {name}: {e}")))?;
                match name.as_str() {
                    "name" => new.name = text,
                    "description" => new.description = text,
                    _ => new.attachment_type = text,
                }
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(new)
}

#[utoipa::path(
    post,
    path = "/patients/{id}/attachments",
    tag = "attachments",
    params(("id" = u64, Path, description = "Owning patient id")),
    request_body(content = AttachmentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Attachment stored", body = AttachmentRes),
        (status = 400, description = "Invalid form, empty data or unknown patient", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Attach a file to a patient
#[axum::debug_handler]
pub async fn add_attachment(
    State(state): State<AppState>,
    Path(patient_id): Path<RecordId>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AttachmentRes>), ApiError> {
    let new = read_form(multipart).await?;
    let attachment = state
        .attachments
        .add_attachment_to_patient(patient_id, new)?;
    Ok((StatusCode::CREATED, Json(attachment.into())))
}

#[utoipa::path(
    delete,
    path = "/attachments/{id}",
    tag = "attachments",
    params(("id" = u64, Path, description = "Attachment id")),
    responses(
        (status = 204, description = "Attachment deleted"),
        (status = 400, description = "Unknown attachment", body = ErrorBody)
    ),
    security(("bearer" = []))
)]
/// Delete an attachment
#[axum::debug_handler]
pub async fn delete_attachment(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, ApiError> {
    state.attachments.delete_attachment(id)?;
    Ok(StatusCode::NO_CONTENT)
}
