use ag_server::{app_with_state, state::AppState};
use axum::body::Body;
use axum::http::Request;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tokio::runtime::Runtime;
use tower::ServiceExt;

fn bench_http_health(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    c.bench_function("http_health_1000", |b| {
        b.iter(|| {
            rt.block_on(async {
                for _ in 0..1000 {
                    let app = app_with_state(AppState::new());
                    let req = Request::builder()
                        .uri("/health")
                        .body(Body::empty())
                        .unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

fn bench_http_optimize(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    c.bench_function("http_optimize_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let state = AppState::new();
                for i in 0..100 {
                    let app = app_with_state(state.clone());
                    let body = serde_json::json!({
                        "text": format!(
                            "Please note that tractor TRC{i:03} is currently operating in the north field"
                        ),
                        "service": "fleet",
                    });
                    let req = Request::builder()
                        .method("POST")
                        .uri("/api/v1/optimize")
                        .header("content-type", "application/json")
                        .body(Body::from(serde_json::to_vec(&body).unwrap()))
                        .unwrap();
                    let resp = app.oneshot(req).await.unwrap();
                    black_box(resp.status());
                }
            })
        })
    });
}

criterion_group!(benches, bench_http_health, bench_http_optimize);
criterion_main!(benches);
