use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::{
    AppState, db,
    db::models::{api::ApiResponse, company::CompanyPage},
    error::AppResult,
    services::ProjectsService,
};

pub async fn public_page(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> AppResult<Json<ApiResponse<CompanyPage>>> {
    let page = db::run(&state.db, move |conn| ProjectsService::public_page(conn, &slug)).await?;
    Ok(Json(ApiResponse::success(page, "Company retrieved successfully")))
}
