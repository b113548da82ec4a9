use crate::db::models::api::ApiResponse;
use axum::{Json, http::StatusCode, response::IntoResponse};
use diesel::result::DatabaseErrorKind;
use serde::Serialize;
use thiserror::Error;

/// Coarse classification consumed by the error boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    AuthExpired,
    Unauthorized,
    Other,
}

impl ErrorClass {
    pub fn is_auth(self) -> bool {
        matches!(self, ErrorClass::AuthExpired | ErrorClass::Unauthorized)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Session expired: {message}")]
    AuthExpired { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address has not been confirmed")]
    EmailNotConfirmed,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        field: Option<String>,
        code: Option<String>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AppError::AuthExpired { .. } => ErrorClass::AuthExpired,
            AppError::Unauthorized { .. } => ErrorClass::Unauthorized,
            AppError::Jwt(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ErrorClass::AuthExpired,
                _ => ErrorClass::Unauthorized,
            },
            _ => ErrorClass::Other,
        }
    }

    /// Lifts free-text failures reported by an upstream service into the
    /// typed taxonomy. Only the data-layer edge should need this.
    pub fn from_upstream_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if lowered.contains("unauthorized") || lowered.contains("auth") {
            if lowered.contains("expired") {
                AppError::AuthExpired { message }
            } else {
                AppError::Unauthorized { message }
            }
        } else {
            AppError::Internal(message)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let class = self.class();
        let (status, response) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::internal_error("Database error"),
                )
            }
            AppError::Pool(ref e) => {
                tracing::error!("Connection pool error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::internal_error("Connection error"),
                )
            }
            AppError::Redis(ref e) => {
                tracing::error!("Redis error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::internal_error("Session store error"),
                )
            }
            AppError::AuthExpired { ref message } | AppError::Unauthorized { ref message } => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::<()>::unauthorized(message),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiResponse::<()>::error(
                    401,
                    "Invalid email or password",
                    vec![crate::db::models::api::ErrorDetail {
                        field: None,
                        code: crate::db::models::api::error_codes::AUTH_INVALID_CREDENTIALS
                            .to_string(),
                        message: "Invalid email or password".to_string(),
                    }],
                ),
            ),
            AppError::EmailNotConfirmed => (
                StatusCode::FORBIDDEN,
                ApiResponse::<()>::error(
                    403,
                    "Email address has not been confirmed",
                    vec![crate::db::models::api::ErrorDetail {
                        field: Some("email".to_string()),
                        code: crate::db::models::api::error_codes::AUTH_EMAIL_NOT_CONFIRMED
                            .to_string(),
                        message: "Confirm your email address before signing in".to_string(),
                    }],
                ),
            ),
            AppError::Validation { ref message } => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::bad_request(message),
            ),
            AppError::NotFound { ref resource } => (
                StatusCode::NOT_FOUND,
                ApiResponse::<()>::not_found(&format!("{} not found", resource)),
            ),
            AppError::Conflict {
                ref message,
                ref field,
                ref code,
            } => (
                StatusCode::CONFLICT,
                ApiResponse::<()>::conflict(message, field.clone(), code.as_deref().unwrap_or("")),
            ),
            AppError::Config(ref e) => {
                tracing::error!("Configuration error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::internal_error("Configuration error"),
                )
            }
            AppError::Jwt(ref e) => {
                tracing::debug!("JWT error: {}", e);
                (
                    StatusCode::UNAUTHORIZED,
                    ApiResponse::<()>::unauthorized("Invalid token"),
                )
            }
            AppError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::internal_error("Password processing error"),
                )
            }
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::internal_error("Internal server error"),
                )
            }
        };

        let mut response = (status, Json(response)).into_response();
        response.extensions_mut().insert(class);
        response
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::AuthExpired {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn conflict_with_code(
        message: impl Into<String>,
        field: Option<String>,
        code: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            message: message.into(),
            field,
            code: Some(code.into()),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Turns a unique-index violation into `conflict`; other database errors pass through.
    pub fn unique_violation_or(
        error: diesel::result::Error,
        conflict: impl FnOnce() -> AppError,
    ) -> AppError {
        match error {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                conflict()
            }
            other => AppError::Database(other),
        }
    }
}
