use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthEvent,
    db,
    db::models::{
        api::ApiResponse,
        auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    },
    error::AppResult,
    middleware::auth::{Session, removal_cookie, session_cookie},
    routes::paths,
    services::AuthService,
    validation::{ValidatedJson, auth::safe_redirect_target},
};

#[derive(Deserialize)]
pub struct LoginPageQuery {
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct LoginPage {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Landing target for every "sign in required" redirect.
pub async fn login_page(Query(query): Query<LoginPageQuery>) -> impl IntoResponse {
    let page = LoginPage {
        action: paths::LOGIN,
        error: query.error,
    };
    (
        StatusCode::OK,
        Json(ApiResponse::success(page, "Sign in required")),
    )
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Response> {
    let user = db::run(&state.db, move |conn| AuthService::login(conn, &payload)).await?;
    let auth_user = user.to_auth_user();

    let issued = state.sessions.start(&auth_user).await?;
    state
        .auth_hub
        .publish_to_user(auth_user.id, AuthEvent::SignedIn, Some(auth_user.clone()));
    tracing::info!(user_id = %auth_user.id, session_id = %issued.session_id, "User signed in");

    let jar = jar.add(session_cookie(issued.token.clone(), state.config.secure_cookies()));
    let response = LoginResponse {
        access_token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
        user: auth_user,
        redirect_to: paths::DASHBOARD.to_string(),
    };

    Ok((
        StatusCode::OK,
        jar,
        Json(ApiResponse::success(response, "Login successful")),
    )
        .into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Response> {
    let bcrypt_cost = state.config.bcrypt_cost;
    let (user, company) =
        db::run(&state.db, move |conn| AuthService::register(conn, &payload, bcrypt_cost)).await?;

    let confirmation_path = state.confirmations.confirmation_path(user.id, &user.email);
    tracing::info!(
        user_id = %user.id,
        user_type = ?user.user_type,
        company = ?company.as_ref().map(|c| c.slug.as_str()),
        "User registered"
    );
    tracing::debug!(user_id = %user.id, link = %confirmation_path, "Confirmation link issued");

    let confirmation_url = if state.config.node_env.is_production() {
        None
    } else {
        Some(confirmation_path)
    };

    let response = RegisterResponse {
        user: user.to_auth_user(),
        confirmation_url,
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(
            response,
            "Registration successful, confirm your email to sign in",
        )),
    )
        .into_response())
}

#[derive(Deserialize)]
pub struct ConfirmQuery {
    pub user_id: Option<String>,
    pub token_hash: Option<String>,
    pub next: Option<String>,
}

/// Email confirmation link target. Every failure lands on the login page.
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<ConfirmQuery>,
) -> Response {
    let (Some(user_id), Some(token_hash)) = (
        query.user_id.as_deref().and_then(|id| Uuid::parse_str(id).ok()),
        query.token_hash.clone(),
    ) else {
        return Redirect::to(paths::CONFIRMATION_FAILED).into_response();
    };

    let signer = state.confirmations.clone();
    let confirmed = db::run(&state.db, move |conn| {
        AuthService::confirm_email(conn, &signer, user_id, &token_hash)
    })
    .await;

    let user = match confirmed {
        Ok(user) => user.to_auth_user(),
        Err(error) => {
            tracing::warn!(user_id = %user_id, error = %error, "Email confirmation failed");
            return Redirect::to(paths::CONFIRMATION_FAILED).into_response();
        }
    };

    let issued = match state.sessions.start(&user).await {
        Ok(issued) => issued,
        Err(error) => {
            tracing::error!(user_id = %user.id, error = %error, "Failed to start session after confirmation");
            return Redirect::to(paths::CONFIRMATION_FAILED).into_response();
        }
    };
    state
        .auth_hub
        .publish_to_user(user.id, AuthEvent::SignedIn, Some(user.clone()));
    tracing::info!(user_id = %user.id, "Email confirmed");

    let target = safe_redirect_target(query.next.as_deref(), paths::DASHBOARD);
    let jar = jar.add(session_cookie(issued.token, state.config.secure_cookies()));
    (jar, Redirect::to(&target)).into_response()
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    session: Session,
) -> AppResult<Response> {
    state.sessions.end(&session).await?;
    let notified = state
        .auth_hub
        .publish(&session.id, AuthEvent::SignedOut, None);
    tracing::info!(
        user_id = %session.user.id,
        session_id = %session.id,
        had_listener = notified,
        "User signed out"
    );

    let jar = jar.add(removal_cookie());
    Ok((jar, Json(ApiResponse::<()>::ok("Signed out"))).into_response())
}
