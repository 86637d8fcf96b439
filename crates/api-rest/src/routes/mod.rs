//! HTTP handlers and the router that mounts them.

pub mod attachments;
pub mod conditions;
pub mod health;
pub mod patients;
pub mod users;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::require_auth;
use crate::AppState;

/// Builds the complete REST application.
///
/// Everything under `/public/` is reachable without a token; every other route goes through
/// [`require_auth`] first.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/public/health", get(health::health))
        .route("/public/users", post(users::create_user))
        .route("/public/users/login", post(users::login))
        .route(
            "/patients",
            get(patients::search_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:id",
            put(patients::update_patient).delete(patients::delete_patient),
        )
        .route(
            "/patients/:id/attachments",
            post(attachments::add_attachment)
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route(
            "/patients/:id/diagnosedConditions",
            post(conditions::add_diagnosed_condition),
        )
        .route("/attachments/:id", delete(attachments::delete_attachment))
        .route(
            "/diagnosedConditions/:id",
            delete(conditions::delete_diagnosed_condition),
        )
        .merge(SwaggerUi::new("/public/docs").url("/public/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
