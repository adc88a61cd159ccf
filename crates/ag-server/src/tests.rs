use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::app;

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ========== Health and status ==========

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn test_status_reports_configuration() {
    let (status, body) = get(app(), "/api/v1/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agricultural_safety_mode"], true);
    assert_eq!(body["default_level"], "standard");
    assert_eq!(
        body["services"],
        json!(["equipment", "fleet", "monitoring", "safety"])
    );
    assert_eq!(body["iso_compliance"]["iso_11783"], true);
    assert_eq!(body["statistics"]["total_requests"], 0);
}

// ========== Optimize ==========

#[tokio::test]
async fn test_optimize_basic() {
    let body = json!({
        "text": "ISOBUS emergency stop initiated for tractor TRC001",
        "service": "equipment",
        "token_budget": 1000,
    });
    let (status, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["output"], "ISOBUS emergency stop initiated tractor TRC001");
    assert_eq!(resp["tokens_saved"], 1);
    assert_eq!(resp["level_applied"], "conservative");
    assert_eq!(resp["stages_completed"], 4);
    assert_eq!(resp["optimization_applied"], true);
    assert_eq!(resp["fallback_used"], false);
    assert_eq!(resp["compliance_maintained"], true);
}

#[tokio::test]
async fn test_optimize_uses_service_preset_level() {
    let body = json!({
        "text": "Routine crew update covering the morning shift",
        "service": "fleet",
    });
    let (status, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["level_applied"], "aggressive");
}

#[tokio::test]
async fn test_optimize_explicit_level_overrides_preset() {
    let body = json!({
        "text": "Routine crew update covering the morning shift",
        "service": "fleet",
        "level": "conservative",
    });
    let (_, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(resp["level_applied"], "conservative");
}

#[tokio::test]
async fn test_optimize_unknown_service_uses_default_level() {
    let body = json!({
        "text": "Routine crew update covering the morning shift",
        "service": "weather",
    });
    let (status, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["level_applied"], "standard");
}

#[tokio::test]
async fn test_safety_service_forces_conservative() {
    let body = json!({
        "text": "Routine crew update covering the morning shift",
        "service": "safety",
        "level": "aggressive",
    });
    let (_, resp) = post_json(app(), "/api/v1/optimize", body).await;
    // force_safety_critical on the preset trumps the requested level.
    assert_eq!(resp["level_applied"], "conservative");
}

#[tokio::test]
async fn test_optimize_bullet_format() {
    let body = json!({
        "text": "Fleet coordination active. Harvest proceeding in north field.",
        "service": "equipment",
        "format": "bullet_points",
    });
    let (status, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp["output"],
        "- Fleet coordination active\n- Harvest proceeding in north field"
    );
}

// ========== Validation errors ==========

#[tokio::test]
async fn test_optimize_empty_text_is_bad_request() {
    let body = json!({ "text": "   ", "service": "fleet" });
    let (status, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_optimize_budget_out_of_range_is_bad_request() {
    let body = json!({
        "text": "status nominal",
        "service": "fleet",
        "token_budget": 50,
    });
    let (status, resp) = post_json(app(), "/api/v1/optimize", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("token budget"));
}

// ========== Statistics ==========

#[tokio::test]
async fn test_statistics_reflect_requests() {
    let state = crate::state::AppState::new();
    let body = json!({
        "text": "ISOBUS emergency stop initiated for tractor TRC001",
        "service": "equipment",
    });
    post_json(crate::app_with_state(state.clone()), "/api/v1/optimize", body).await;

    let (status, stats) = get(crate::app_with_state(state.clone()), "/api/v1/statistics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["global"]["total_requests"], 1);
    assert_eq!(stats["global"]["safety_preservations"], 1);
    assert_eq!(stats["services"]["equipment"]["total_requests"], 1);

    let (status, resp) = post_json(
        crate::app_with_state(state.clone()),
        "/api/v1/statistics/reset",
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["reset"], true);

    let (_, stats) = get(crate::app_with_state(state), "/api/v1/statistics").await;
    assert_eq!(stats["global"]["total_requests"], 0);
}
