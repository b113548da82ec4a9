use axum::http::StatusCode;
use pledgekit::routes::create_router;

use super::{get, json_body, location, send};
use crate::test_state;

#[tokio::test]
async fn health_reports_environment() {
    let response = send(create_router(test_state()), get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["environment"], "test");
    assert_eq!(body["data"]["stripe_mode"], "test");
}

#[tokio::test]
async fn stripe_config_is_built_once() {
    let state = test_state();
    assert_eq!(state.stripe_loader.init_count(), 0);

    for _ in 0..2 {
        let response = send(create_router(state.clone()), get("/stripe/config", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["publishable_key"], "pk_test_integration");
        assert_eq!(body["data"]["script_url"], "https://js.stripe.com/v3");
    }
    assert_eq!(state.stripe_loader.init_count(), 1);
}

#[tokio::test]
async fn login_page_echoes_error() {
    let response = send(
        create_router(test_state()),
        get("/login?error=confirmation_failed", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["data"]["action"], "/login");
    assert_eq!(body["data"]["error"], "confirmation_failed");
}

#[tokio::test]
async fn malformed_confirmation_link_redirects_to_login() {
    let app = || create_router(test_state());

    let response = send(app(), get("/auth/confirm", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login?error=confirmation_failed"));

    let response = send(
        app(),
        get("/auth/confirm?user_id=not-a-uuid&token_hash=abc", None),
    )
    .await;
    assert_eq!(location(&response), Some("/login?error=confirmation_failed"));
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = send(create_router(test_state()), request).await;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("trace-me-123")
    );
}
