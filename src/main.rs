// src/main.rs

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use labcoach::api::http::app_router;
use labcoach::config::CONFIG;
use labcoach::scenario::SCENARIO;
use labcoach::state::create_app_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(CONFIG.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting labcoach backend");
    info!("Scenario: {} ({} steps)", SCENARIO.title, SCENARIO.total_steps());
    info!(
        "Coach: {}",
        if CONFIG.coach_enabled() {
            "live (OpenAI-compatible endpoint)"
        } else {
            "fallback only (no OPENAI_API_KEY)"
        }
    );

    // Graph invariants are a start-up failure, never a request failure.
    SCENARIO
        .validate()
        .context("bundled scenario failed validation")?;

    let app_state = Arc::new(create_app_state());
    let app = app_router(app_state);

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!("Lab API listening on http://{}/api", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
