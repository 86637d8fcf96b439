//! # API REST
//!
//! REST API implementation for MCG.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - Bearer token checks on every non-public route
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, multipart upload, CORS, request tracing)
//!
//! Uses `api-shared` for authentication and `mcg-core` for the domain services.

#![warn(rust_2018_idioms)]

pub mod docs;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schemas;

use std::sync::Arc;

use api_shared::{AuthService, TokenConfig};
use mcg_core::{
    AttachmentService, DiagnosedConditionService, EntityStore, PasswordHashing, PatientService,
    UserService,
};

pub use error::ApiError;
pub use routes::router;

/// Application state shared across REST API handlers
///
/// Every service holds a clone of the same [`EntityStore`].
#[derive(Clone, Debug)]
pub struct AppState {
    pub patients: PatientService,
    pub attachments: AttachmentService,
    pub conditions: DiagnosedConditionService,
    pub users: UserService,
    pub auth: AuthService,
    /// Body size cap for the attachment upload route.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: EntityStore,
        hasher: Arc<dyn PasswordHashing>,
        token: &TokenConfig,
        max_upload_bytes: usize,
    ) -> Self {
        let users = UserService::new(store.clone(), hasher);
        Self {
            patients: PatientService::new(store.clone()),
            attachments: AttachmentService::new(store.clone()),
            conditions: DiagnosedConditionService::new(store),
            auth: AuthService::new(users.clone(), token),
            users,
            max_upload_bytes,
        }
    }
}
