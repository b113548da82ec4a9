use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::{AppState, db::models::api::ApiResponse, stripe::StripeMode};

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub environment: &'static str,
    pub stripe_mode: StripeMode,
    pub tracked_sessions: usize,
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(
        HealthStatus {
            status: "ok",
            environment: state.config.node_env.as_str(),
            stripe_mode: state.stripe.mode(),
            tracked_sessions: state.auth_hub.len(),
        },
        "Service is healthy",
    ))
}
