use axum::{
    http::{HeaderValue, Request, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::any::Any;

use crate::error::{AppError, ErrorClass};
use crate::middleware::auth::removal_cookie;
use crate::routes::paths;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryAction {
    RedirectToLogin,
    LogOnly,
}

pub fn action_for(class: ErrorClass) -> BoundaryAction {
    if class.is_auth() {
        BoundaryAction::RedirectToLogin
    } else {
        BoundaryAction::LogOnly
    }
}

fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_str(&removal_cookie().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("pk_session=; Path=/; Max-Age=0"))
}

/// Turns auth-class failures into a login redirect and logs everything else.
pub async fn error_boundary(
    request: Request<axum::body::Body>,
    next: Next<axum::body::Body>,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;
    let Some(class) = response.extensions().get::<ErrorClass>().copied() else {
        return response;
    };

    match action_for(class) {
        BoundaryAction::RedirectToLogin => {
            tracing::info!(method = %method, path = %path, class = ?class, "Auth failure, redirecting to login");
            let mut redirect = Redirect::to(paths::LOGIN).into_response();
            redirect
                .headers_mut()
                .append(SET_COOKIE, clear_session_cookie());
            redirect
        }
        BoundaryAction::LogOnly => {
            let status = response.status();
            if status.is_server_error() {
                tracing::error!(method = %method, path = %path, status = %status, "Request failed");
            } else {
                tracing::warn!(method = %method, path = %path, status = %status, "Request rejected");
            }
            response
        }
    }
}

/// Panic handler for `CatchPanicLayer`: the panic becomes a tagged internal error.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    AppError::internal(format!("Handler panicked: {}", detail)).into_response()
}
