use axum::response::Json;

use api_shared::{HealthRes, HealthService};

#[utoipa::path(
    get,
    path = "/public/health",
    tag = "public",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Requires no token.
#[axum::debug_handler]
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}
