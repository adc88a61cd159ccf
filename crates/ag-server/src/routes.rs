use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use ag_core::config::OptimizerConfig;
use ag_core::types::{MessageFormat, OptimizationLevel, OptimizationRequest, OptimizationResult};

use crate::error::ApiError;
use crate::state::AppState;

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(status))
}

pub fn optimize_routes() -> Router<AppState> {
    Router::new().route("/api/v1/optimize", post(optimize))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/statistics", get(statistics))
        .route("/api/v1/statistics/reset", post(reset_statistics))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    let config = state.optimizer.config();
    let mut services: Vec<&String> = config.services.keys().collect();
    services.sort();
    Json(json!({
        "status": "ok",
        "agricultural_safety_mode": config.agricultural_safety_mode,
        "default_level": config.default_level,
        "services": services,
        "iso_compliance": config.iso_compliance,
        "statistics": state.optimizer.stats().snapshot().global,
    }))
}

/// Optimization request as received over the wire. Level, format, and
/// budget are optional; missing fields are resolved from the service
/// preset and the configured defaults.
#[derive(Debug, Deserialize)]
struct OptimizeBody {
    text: String,
    service: String,
    level: Option<OptimizationLevel>,
    format: Option<MessageFormat>,
    token_budget: Option<u32>,
    #[serde(default)]
    safety_critical: bool,
    #[serde(default)]
    context: HashMap<String, String>,
}

fn resolve_request(config: &OptimizerConfig, body: OptimizeBody) -> OptimizationRequest {
    let preset = config.services.get(&body.service);
    let level = body
        .level
        .or_else(|| preset.map(|p| p.level))
        .unwrap_or(config.default_level);
    // Safety services force the flag; callers can only add it, never
    // clear it.
    let safety_critical =
        body.safety_critical || preset.is_some_and(|p| p.force_safety_critical);
    OptimizationRequest {
        text: body.text,
        service: body.service,
        level,
        format: body.format.unwrap_or(MessageFormat::Standard),
        token_budget: body.token_budget.unwrap_or(config.default_token_budget),
        safety_critical,
        context: body.context,
    }
}

async fn optimize(
    State(state): State<AppState>,
    Json(body): Json<OptimizeBody>,
) -> Result<Json<OptimizationResult>, ApiError> {
    let req = resolve_request(state.optimizer.config(), body);
    let result = state.optimizer.optimize(&req)?;
    Ok(Json(result))
}

async fn statistics(State(state): State<AppState>) -> Json<ag_stats::StatsSnapshot> {
    Json(state.optimizer.stats().snapshot())
}

async fn reset_statistics(State(state): State<AppState>) -> Json<Value> {
    state.optimizer.stats().reset();
    tracing::info!("statistics reset");
    Json(json!({ "reset": true }))
}
