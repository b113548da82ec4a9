use axum::{Json, extract::State};
use std::sync::Arc;

use crate::{AppState, db::models::api::ApiResponse, error::AppResult, stripe::StripeJs};

/// What a browser needs to load Stripe.js. Built on first request, shared afterwards.
pub async fn client_config(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<StripeJs>>> {
    let client = state.stripe_loader.get().await?;
    Ok(Json(ApiResponse::success(
        client.as_ref().clone(),
        "Stripe configuration",
    )))
}
