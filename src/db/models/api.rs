use serde::Serialize;

// Unified API response envelope
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorDetail>>,
    pub timestamp: String,
}

#[derive(Serialize, Debug)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn build(
        success: bool,
        code: u16,
        message: &str,
        data: Option<T>,
        errors: Option<Vec<ErrorDetail>>,
    ) -> Self {
        Self {
            success,
            code,
            message: message.to_string(),
            data,
            errors,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn failure(code: u16, error_code: &str, message: &str) -> Self {
        Self::build(
            false,
            code,
            message,
            None,
            Some(vec![ErrorDetail {
                field: None,
                code: error_code.to_string(),
                message: message.to_string(),
            }]),
        )
    }

    pub fn success(data: T, message: &str) -> Self {
        Self::build(true, 200, message, Some(data), None)
    }

    pub fn created(data: T, message: &str) -> Self {
        Self::build(true, 201, message, Some(data), None)
    }

    pub fn ok(message: &str) -> Self {
        Self::build(true, 200, message, None, None)
    }

    pub fn error(code: u16, message: &str, errors: Vec<ErrorDetail>) -> Self {
        Self::build(false, code, message, None, Some(errors))
    }

    pub fn bad_request(message: &str) -> Self {
        Self::failure(400, "BAD_REQUEST", message)
    }

    pub fn unauthorized(message: &str) -> Self {
        Self::failure(401, "UNAUTHORIZED", message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::failure(404, "NOT_FOUND", message)
    }

    pub fn conflict(message: &str, field: Option<String>, error_code: &str) -> Self {
        Self::build(
            false,
            409,
            message,
            None,
            Some(vec![ErrorDetail {
                field,
                code: error_code.to_string(),
                message: message.to_string(),
            }]),
        )
    }

    pub fn internal_error(message: &str) -> Self {
        Self::failure(500, "INTERNAL_ERROR", message)
    }
}

// Business error codes
pub mod error_codes {
    pub const AUTH_INVALID_CREDENTIALS: &str = "AUTH_001";
    pub const AUTH_EMAIL_NOT_CONFIRMED: &str = "AUTH_002";

    pub const USER_EMAIL_EXISTS: &str = "USER_001";
    pub const COMPANY_SLUG_EXISTS: &str = "COMPANY_001";

    pub const PROJECT_INVALID_TRANSITION: &str = "PROJECT_001";

    pub const PLEDGE_PROJECT_CLOSED: &str = "PLEDGE_001";
    pub const PLEDGE_NOT_CANCELLABLE: &str = "PLEDGE_002";
}
