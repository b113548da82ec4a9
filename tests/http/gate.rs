use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
    routing::get as get_route,
};
use pledgekit::{
    AppState,
    cache::SessionStore,
    db::{enums::UserType, lazy_pool},
    error::{AppError, AppResult},
    middleware::{
        auth::resolve_session,
        gate::{AccessRule, protect},
    },
    routes::create_router,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{get, json_body, location, send};
use crate::{sign_in, test_config, test_state};

#[tokio::test]
async fn company_session_on_user_dashboard_redirects_to_dashboard() {
    let state = test_state();
    let (_, token) = sign_in(&state, Some(UserType::Company)).await;

    let response = send(create_router(state), get("/dashboard/user", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn user_session_on_company_routes_redirects_to_dashboard() {
    let state = test_state();
    let (_, token) = sign_in(&state, Some(UserType::User)).await;

    let response = send(
        create_router(state.clone()),
        get("/dashboard/company", Some(&token)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));

    let request = Request::builder()
        .method("POST")
        .uri("/dashboard/company/projects")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(create_router(state), request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard"));
}

#[tokio::test]
async fn missing_session_on_settings_redirects_to_login() {
    let response = send(create_router(test_state()), get("/settings", None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn garbage_token_is_treated_as_no_session() {
    let response = send(
        create_router(test_state()),
        get("/dashboard/user", Some("not-a-jwt")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let state = test_state();
    let (_, token) = sign_in(&state, Some(UserType::User)).await;

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::COOKIE, format!("pk_session={}", token))
        .body(Body::empty())
        .unwrap();
    let response = send(create_router(state), request).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/dashboard/user"));
}

#[tokio::test]
async fn dashboard_home_redirects_by_role() {
    let state = test_state();
    let (_, company_token) = sign_in(&state, Some(UserType::Company)).await;
    let (_, user_token) = sign_in(&state, Some(UserType::User)).await;
    let (_, pending_token) = sign_in(&state, None).await;

    let response = send(create_router(state.clone()), get("/dashboard", Some(&company_token))).await;
    assert_eq!(location(&response), Some("/dashboard/company"));

    let response = send(create_router(state.clone()), get("/dashboard", Some(&user_token))).await;
    assert_eq!(location(&response), Some("/dashboard/user"));

    let response = send(create_router(state), get("/dashboard", Some(&pending_token))).await;
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn session_without_role_cannot_reach_role_routes() {
    let state = test_state();
    let (_, token) = sign_in(&state, None).await;

    let response = send(create_router(state), get("/dashboard/company", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn matching_role_reaches_handler_unmodified() {
    let state = test_state();

    for required in UserType::ALL {
        let app = protect(
            Router::new().route("/inside", get_route(|| async { "handler output" })),
            AccessRule::Role(required),
        )
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .with_state(state.clone());

        for actual in UserType::ALL {
            let (_, token) = sign_in(&state, Some(actual)).await;
            let response = send(app.clone(), get("/inside", Some(&token))).await;

            if actual == required {
                assert_eq!(response.status(), StatusCode::OK);
                let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
                assert_eq!(&bytes[..], b"handler output");
            } else {
                assert_eq!(response.status(), StatusCode::SEE_OTHER);
                assert_eq!(location(&response), Some("/dashboard"));
            }
        }
    }
}

#[tokio::test]
async fn logout_revokes_session_and_clears_cookie() {
    let state = test_state();
    let (_, token) = sign_in(&state, Some(UserType::User)).await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let response = send(create_router(state.clone()), request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("pk_session="));
    let body = json_body(response).await;
    assert_eq!(body["success"], true);

    let response = send(create_router(state), get("/settings", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

/// Accepts new sessions but cannot answer lookups, like a store that went away mid-flight.
struct UnreachableStore;

#[async_trait::async_trait]
impl SessionStore for UnreachableStore {
    async fn insert(&self, _jti: &str, _user_id: Uuid, _ttl: Duration) -> AppResult<()> {
        Ok(())
    }

    async fn lookup(&self, _jti: &str) -> AppResult<Option<Uuid>> {
        Err(AppError::internal("session store offline"))
    }

    async fn revoke(&self, _jti: &str) -> AppResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn session_store_outage_is_a_server_error_not_a_sign_out() {
    let config = test_config();
    let pool = lazy_pool(&config);
    let state = Arc::new(AppState::new(pool, config, Arc::new(UnreachableStore)).unwrap());
    let (_, token) = sign_in(&state, Some(UserType::User)).await;

    let response = send(create_router(state), get("/settings", Some(&token))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(location(&response), None);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}
