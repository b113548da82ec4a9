use axum::{
    Router,
    http::{StatusCode, header},
    middleware::from_fn,
    routing::get as get_route,
};
use pledgekit::{
    error::{AppError, AppResult, ErrorClass},
    middleware::error_boundary::{error_boundary, panic_response},
};
use tower_http::catch_panic::CatchPanicLayer;

use super::{get, json_body, location, send};

async fn expired_upstream() -> AppResult<&'static str> {
    Err(AppError::from_upstream_message("Unauthorized: token expired"))
}

async fn network_failure() -> AppResult<&'static str> {
    Err(AppError::from_upstream_message("Network request failed"))
}

async fn missing_project() -> AppResult<&'static str> {
    Err(AppError::not_found("Project"))
}

async fn healthy() -> AppResult<&'static str> {
    Ok("fine")
}

async fn exploding() -> &'static str {
    panic!("handler blew up")
}

fn app() -> Router {
    Router::new()
        .route("/expired", get_route(expired_upstream))
        .route("/network", get_route(network_failure))
        .route("/missing", get_route(missing_project))
        .route("/healthy", get_route(healthy))
        .route("/panic", get_route(exploding))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(error_boundary))
}

#[tokio::test]
async fn expired_auth_error_redirects_to_login() {
    let response = send(app(), get("/expired", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));

    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(cleared.starts_with("pk_session=;"));
}

#[tokio::test]
async fn network_error_is_only_logged() {
    let response = send(app(), get("/network", None)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(location(&response).is_none());
    assert_eq!(
        response.extensions().get::<ErrorClass>(),
        Some(&ErrorClass::Other)
    );

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn client_errors_pass_through() {
    let response = send(app(), get("/missing", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(location(&response).is_none());
}

#[tokio::test]
async fn successful_responses_are_untouched() {
    let response = send(app(), get("/healthy", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    assert_eq!(&bytes[..], b"fine");
}

#[tokio::test]
async fn panics_become_logged_internal_errors() {
    let response = send(app(), get("/panic", None)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(location(&response).is_none());
}
