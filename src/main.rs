use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use api_shared::ApiConfig;
use mcg_core::{Argon2Hasher, EntityStore};

/// Main entry point for the MCG application
///
/// Resolves configuration once, builds one in-memory record store shared by every service, and
/// serves the REST API until the process is stopped. All records are lost on exit.
///
/// # Environment Variables
/// - `MCG_REST_ADDR`: REST server address (default: "0.0.0.0:8080")
/// - `MCG_TOKEN_SECRET`: HS256 signing secret (required)
/// - `MCG_TOKEN_ISSUER`: token issuer (default: "localhost")
/// - `MCG_TOKEN_TTL_SECS`: token lifetime in seconds (default: 600)
/// - `MCG_MAX_UPLOAD_BYTES`: attachment upload body cap in bytes (default: 25 MiB)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mcg=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_shared=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = ApiConfig::from_env()?;

    let store = EntityStore::new();
    let state = AppState::new(
        store,
        Arc::new(Argon2Hasher::new()),
        cfg.token(),
        cfg.max_upload_bytes(),
    );
    let app = router(state);

    tracing::info!("++ Starting MCG REST on {}", cfg.rest_addr());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
