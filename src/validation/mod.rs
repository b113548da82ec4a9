pub mod auth;
pub mod pledge;
pub mod project;

use axum::{Json, async_trait, extract::FromRequest, http::Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON extractor that runs `validator` rules before the handler sees the body.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S, axum::body::Body> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(
        req: Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))?;

        value.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .iter()
                .flat_map(|(field, field_errors)| {
                    field_errors.iter().map(move |error| {
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value for field: {}", field))
                    })
                })
                .collect();
            messages.sort();
            AppError::validation(messages.join("; "))
        })?;

        Ok(ValidatedJson(value))
    }
}

pub mod rules {
    use validator::ValidationError;

    /// Requires at least three of: length >= 8, lowercase, uppercase, digit, symbol.
    pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
        let checks = [
            password.len() >= 8,
            password.chars().any(|c| c.is_lowercase()),
            password.chars().any(|c| c.is_uppercase()),
            password.chars().any(|c| c.is_numeric()),
            password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()),
        ];

        if checks.iter().filter(|passed| **passed).count() < 3 {
            return Err(ValidationError::new("weak_password"));
        }

        Ok(())
    }

    /// Lowercase ASCII letters, digits and single inner hyphens.
    pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(ValidationError::new("invalid_slug_format"));
        }

        if slug.starts_with('-') || slug.ends_with('-') || slug.contains("--") {
            return Err(ValidationError::new("slug_invalid_hyphens"));
        }

        Ok(())
    }
}
