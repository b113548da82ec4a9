use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    AppState, db,
    db::models::{
        api::ApiResponse,
        company::CompanySummary,
        pledge::{CreatePledgeRequest, PledgeSummary},
        project::{CreateProjectRequest, ProjectDetails, UpdateProjectStatusRequest},
    },
    error::AppResult,
    middleware::auth::Session,
    routes::paths,
    services::{DashboardPage, DashboardShell, PledgesService, ProjectsService, RequestContext},
    validation::ValidatedJson,
};

#[derive(Serialize)]
pub struct CompanyDashboard {
    pub company: CompanySummary,
    pub projects: Vec<ProjectDetails>,
}

#[derive(Serialize)]
pub struct UserDashboard {
    pub pledges: Vec<PledgeSummary>,
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Sends each role to its own dashboard; a session without a role signs in again.
pub async fn dashboard_home(session: Session) -> Redirect {
    match session.user.user_type {
        Some(user_type) => Redirect::to(user_type.dashboard_route()),
        None => Redirect::to(paths::LOGIN),
    }
}

pub async fn company_dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> AppResult<Json<ApiResponse<DashboardPage<CompanyDashboard>>>> {
    let ctx = RequestContext::from(&session);
    let (company, projects) =
        db::run(&state.db, move |conn| ProjectsService::list_for_company(conn, &ctx)).await?;

    let page = DashboardShell::compose(&session.user, Some(&company.slug)).wrap(CompanyDashboard {
        company: company.summary(),
        projects,
    });
    Ok(Json(ApiResponse::success(page, "Company dashboard")))
}

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    session: Session,
    ValidatedJson(payload): ValidatedJson<CreateProjectRequest>,
) -> AppResult<Response> {
    let ctx = RequestContext::from(&session);
    let project = db::run(&state.db, move |conn| {
        ProjectsService::create(conn, &ctx, &payload, today())
    })
    .await?;

    tracing::info!(project_id = %project.project.id, user_id = %session.user.id, "Project created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(project, "Project created successfully")),
    )
        .into_response())
}

pub async fn update_project_status(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectStatusRequest>,
) -> AppResult<Response> {
    let ctx = RequestContext::from(&session);
    let project = db::run(&state.db, move |conn| {
        ProjectsService::transition(conn, &ctx, project_id, payload.status)
    })
    .await?;

    Ok(Json(ApiResponse::success(project, "Project status updated")).into_response())
}

pub async fn user_dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> AppResult<Json<ApiResponse<DashboardPage<UserDashboard>>>> {
    let ctx = RequestContext::from(&session);
    let pledges = db::run(&state.db, move |conn| PledgesService::list_for_user(conn, &ctx)).await?;

    let page = DashboardShell::compose(&session.user, None).wrap(UserDashboard { pledges });
    Ok(Json(ApiResponse::success(page, "User dashboard")))
}

pub async fn create_pledge(
    State(state): State<Arc<AppState>>,
    session: Session,
    ValidatedJson(payload): ValidatedJson<CreatePledgeRequest>,
) -> AppResult<Response> {
    let ctx = RequestContext::from(&session);
    let pledge = db::run(&state.db, move |conn| {
        PledgesService::create(conn, &ctx, &payload, today())
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::created(pledge, "Pledge created successfully")),
    )
        .into_response())
}

pub async fn cancel_pledge(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(pledge_id): Path<Uuid>,
) -> AppResult<Response> {
    let ctx = RequestContext::from(&session);
    let pledge = db::run(&state.db, move |conn| PledgesService::cancel(conn, &ctx, pledge_id)).await?;

    Ok(Json(ApiResponse::success(pledge, "Pledge cancelled")).into_response())
}
