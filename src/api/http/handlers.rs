// src/api/http/handlers.rs

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::config::CONFIG;
use crate::engine::{Evaluation, CORRECT_MESSAGE};
use crate::state::AppState;

use super::types::{ActionRequest, DebriefRequest};

/// Scenario metadata plus the opening step.
pub async fn scenario_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let scenario = state.engine.scenario();
    Json(json!({
        "title": scenario.title,
        "description": scenario.description,
        "total_steps": scenario.total_steps(),
        "first_step": scenario.first_step()
    }))
}

/// Judge one student action. Unknown step or action → 400; a classified
/// wrong choice is a normal 200 with coaching attached.
pub async fn action_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ActionRequest>,
) -> ApiResult<impl IntoResponse> {
    let evaluation = state
        .engine
        .evaluate(&req.session_id, &req.step_id, &req.action)
        .await?;

    let body = match evaluation {
        Evaluation::Correct { next_step, complete } => json!({
            "correct": true,
            "message": CORRECT_MESSAGE,
            "next_step": next_step,
            "complete": complete
        }),
        Evaluation::Incorrect {
            consequence,
            severity,
            hint,
            current_step,
        } => json!({
            "correct": false,
            "consequence": consequence,
            "severity": severity,
            "hint": hint.text,
            "hint_reason": hint.reason,
            "stay_on_step": true,
            "current_step": current_step
        }),
    };
    Ok(Json(body))
}

/// End-of-exercise debrief. Never fails: an unknown or expired session
/// produces the zero-score debrief.
pub async fn debrief_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DebriefRequest>,
) -> impl IntoResponse {
    Json(state.engine.debrief(&req.session_id).await)
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model": CONFIG.model,
        "timestamp": Utc::now().to_rfc3339()
    }))
}
