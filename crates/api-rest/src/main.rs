//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the validator REST API on its own.
//!
//! ## Intended use
//! Handy during development. The workspace's main `rrf-run` binary serves the same router.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use rrf_core::ValidatorConfig;

/// Main entry point for the RRF REST API server
///
/// # Environment Variables
/// - `RRF_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `RRF_SHOW_SUGGESTED_VALUES`: List allowed values in invalid-code messages (default: true)
/// - `RRF_REFERENCE_DIR`: Directory of reference table overrides
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or reference tables are invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RRF_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("-- Starting RRF REST API on {}", addr);

    let state = AppState::from_config(ValidatorConfig::from_env()?)?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
