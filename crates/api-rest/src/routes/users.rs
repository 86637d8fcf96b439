use axum::{extract::State, http::StatusCode, response::Json};

use crate::error::{ApiError, ErrorBody};
use crate::schemas::{CreateUserReq, LoginReq, LoginRes};
use crate::AppState;

/// Password hashing is CPU-bound, so it runs off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> mcg_core::RecordResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}

#[utoipa::path(
    post,
    path = "/public/users",
    tag = "public",
    request_body = CreateUserReq,
    responses(
        (status = 204, description = "User created"),
        (status = 400, description = "Username or password too short", body = ErrorBody),
        (status = 409, description = "Username is already taken", body = ErrorBody)
    )
)]
/// Register a user account
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserReq>,
) -> Result<StatusCode, ApiError> {
    let users = state.users.clone();
    blocking(move || users.create_user(&req.username, &req.password)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/public/users/login",
    tag = "public",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Access token", body = LoginRes),
        (status = 400, description = "Unknown username or wrong password", body = ErrorBody)
    )
)]
/// Exchange credentials for a bearer token
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> Result<Json<LoginRes>, ApiError> {
    let auth = state.auth.clone();
    let token = blocking(move || auth.login(&req.username, &req.password)).await?;
    Ok(Json(LoginRes { token }))
}
