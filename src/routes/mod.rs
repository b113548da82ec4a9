pub mod auth;
pub mod companies;
pub mod dashboard;
pub mod health;
pub mod settings;
pub mod stripe;

use crate::{
    AppState,
    config::Config,
    db::enums::UserType,
    middleware::{
        auth::resolve_session,
        error_boundary::{error_boundary, panic_response},
        gate::{AccessRule, protect},
        request_tracking_middleware,
    },
    websocket,
};
use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

/// Route paths referenced outside the router itself.
pub mod paths {
    pub const LOGIN: &str = "/login";
    pub const CONFIRMATION_FAILED: &str = "/login?error=confirmation_failed";
    pub const LOGOUT: &str = "/auth/logout";
    pub const DASHBOARD: &str = "/dashboard";
    pub const DASHBOARD_COMPANY: &str = "/dashboard/company";
    pub const DASHBOARD_USER: &str = "/dashboard/user";
    pub const SETTINGS: &str = "/settings";

    pub fn company_page(slug: &str) -> String {
        format!("/companies/{}", slug)
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/confirm", get(auth::confirm))
        .route("/companies/:slug", get(companies::public_page))
        .route("/stripe/config", get(stripe::client_config));

    let session_routes = protect(
        Router::new()
            .route(paths::DASHBOARD, get(dashboard::dashboard_home))
            .route(
                paths::SETTINGS,
                get(settings::get_settings).put(settings::update_settings),
            )
            .route(paths::LOGOUT, post(auth::logout))
            .route("/ws/auth", get(websocket::auth_socket)),
        AccessRule::Authenticated,
    );

    let company_routes = protect(
        Router::new()
            .route(paths::DASHBOARD_COMPANY, get(dashboard::company_dashboard))
            .route(
                "/dashboard/company/projects",
                post(dashboard::create_project),
            )
            .route(
                "/dashboard/company/projects/:project_id/status",
                put(dashboard::update_project_status),
            ),
        AccessRule::Role(UserType::Company),
    );

    let user_routes = protect(
        Router::new()
            .route(paths::DASHBOARD_USER, get(dashboard::user_dashboard))
            .route("/dashboard/user/pledges", post(dashboard::create_pledge))
            .route(
                "/dashboard/user/pledges/:pledge_id/cancel",
                post(dashboard::cancel_pledge),
            ),
        AccessRule::Role(UserType::User),
    );

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(company_routes)
        .merge(user_routes)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn(error_boundary))
        .layer(from_fn_with_state(state.clone(), resolve_session))
        .layer(from_fn(request_tracking_middleware))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
