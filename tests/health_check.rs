mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{app_with, app_with_options, json_body, test_options};
use crop_check::RouterOptions;
use crop_check::providers::mock::MockVisionModel;
use crop_check::providers::ProviderError;
use std::sync::Arc;
use tower::util::ServiceExt;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = app_with(Arc::new(MockVisionModel::replying("{}")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn health_check_ignores_a_broken_model() {
    let model = Arc::new(MockVisionModel::failing(ProviderError::NetworkError(
        "unreachable".to_string(),
    )));
    let app = app_with(model.clone());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(model.last_call().is_none());
}

#[tokio::test]
async fn permissive_cors_allows_any_origin() {
    let app = app_with(Arc::new(MockVisionModel::replying("{}")));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

fn health_request_from(origin: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/health")
        .header("origin", origin)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn origin_list_echoes_only_listed_origins() {
    let options = RouterOptions {
        allowed_origins: vec!["http://localhost:3000".to_string()],
        ..test_options()
    };
    let app = app_with_options(Arc::new(MockVisionModel::replying("{}")), &options);

    let allowed = app
        .clone()
        .oneshot(health_request_from("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let other = app
        .oneshot(health_request_from("http://elsewhere.example"))
        .await
        .unwrap();
    assert_eq!(other.status(), StatusCode::OK);
    assert!(other
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}
