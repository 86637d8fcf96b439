//! Bearer token authentication.
//!
//! Every request outside `/public/` must carry `Authorization: Bearer <token>` with a token
//! issued by [`AuthService`](api_shared::AuthService). Rejected requests never reach a handler.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::AppState;

pub const PUBLIC_PREFIX: &str = "/public/";

pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if req.uri().path().starts_with(PUBLIC_PREFIX) {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return ApiError::Unauthorized("missing bearer token".into()).into_response();
    };

    match state.auth.verify_token(token) {
        Ok(claims) => {
            tracing::debug!(username = %claims.username, "request authenticated");
            next.run(req).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}
