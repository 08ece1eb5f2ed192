// src/api/http/router.rs
// Router composition for the lab API.

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::config::CONFIG;
use crate::state::AppState;

use super::handlers::{action_handler, debrief_handler, health_handler, scenario_handler};

/// Main application router. All endpoints live under /api to match the
/// simulation frontend's expectations.
pub fn app_router(app_state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/scenario", get(scenario_handler))
        .route("/action", post(action_handler))
        .route("/debrief", post(debrief_handler))
        .route("/health", get(health_handler));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(app_state)
}

fn cors_layer() -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    match CONFIG.cors_origin.as_str() {
        "*" => layer.allow_origin(Any),
        origin => match origin.parse::<HeaderValue>() {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                tracing::warn!("invalid LABCOACH_CORS_ORIGIN '{}', allowing any", origin);
                layer.allow_origin(Any)
            }
        },
    }
}
