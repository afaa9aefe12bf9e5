use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use rrf_core::ValidatorConfig;

/// Main entry point for the RRF validator service
///
/// Loads `.env`, resolves the validator configuration once and serves the REST API.
///
/// # Environment Variables
/// - `RRF_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RRF_SHOW_SUGGESTED_VALUES`: List allowed values in invalid-code messages (default: true)
/// - `RRF_REFERENCE_DIR`: Directory of `*.yaml` reference tables overriding the embedded ones
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rrf_run=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RRF_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let config = ValidatorConfig::from_env()?;
    tracing::info!(
        "++ Reference tables: {}",
        config
            .reference_dir()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "embedded".into())
    );
    let state = AppState::from_config(config)?;

    tracing::info!("++ Starting RRF REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
