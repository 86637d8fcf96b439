use serde::Serialize;
use utoipa::ToSchema;

/// Liveness response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service for the REST API
///
/// Reports that the process is up and serving. It does not touch the record store.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "MCG is alive".into(),
        }
    }
}
