//! Accrual Allocation Engine HTTP server entry point.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accrual_engine::api::{AppState, ENGINE_VERSION, create_router};
use accrual_engine::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "config/default";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,accrual_engine=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Accrual Allocation Engine v{}", ENGINE_VERSION);

    let config_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;

    let addr = std::env::var("ACCRUAL_ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, config_dir = %config_dir, "Listening");

    axum::serve(listener, create_router(AppState::new(config))).await?;
    Ok(())
}
