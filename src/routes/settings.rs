use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{
    AppState,
    auth::AuthEvent,
    db,
    db::models::{
        api::ApiResponse,
        auth::{AuthUser, UpdateSettingsRequest, UserDetails},
    },
    error::AppResult,
    middleware::auth::Session,
    services::{AuthService, DashboardPage, DashboardShell, RequestContext},
    validation::ValidatedJson,
};

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> AppResult<Json<ApiResponse<DashboardPage<UserDetails>>>> {
    let ctx = RequestContext::from(&session);
    let details = db::run(&state.db, move |conn| AuthService::user_details(conn, &ctx)).await?;

    let slug = details.company.as_ref().map(|company| company.slug.clone());
    let page = DashboardShell::compose(&session.user, slug.as_deref()).wrap(details);
    Ok(Json(ApiResponse::success(page, "Settings retrieved successfully")))
}

/// Renames the account and tells every live session of the user.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    session: Session,
    ValidatedJson(payload): ValidatedJson<UpdateSettingsRequest>,
) -> AppResult<Json<ApiResponse<AuthUser>>> {
    let ctx = RequestContext::from(&session);
    let user = db::run(&state.db, move |conn| {
        AuthService::update_name(conn, &ctx, &payload.name)
    })
    .await?;

    let auth_user = user.to_auth_user();
    let notified = state
        .auth_hub
        .publish_to_user(auth_user.id, AuthEvent::UserUpdated, Some(auth_user.clone()));
    tracing::info!(user_id = %auth_user.id, sessions = notified, "Settings updated");

    Ok(Json(ApiResponse::success(auth_user, "Settings updated successfully")))
}
