use axum::http::HeaderValue;

use crate::db::enums::UserType;
use crate::db::models::auth::RegisterRequest;
use crate::error::AppError;
use crate::validation::rules::{validate_password_strength, validate_slug};

/// Cross-field registration rules that the field validators cannot express.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if validate_password_strength(&req.password).is_err() {
        return Err(AppError::validation(
            "Password must mix at least three of: lowercase, uppercase, digits, symbols",
        ));
    }

    match (req.user_type, req.company_name.as_deref()) {
        (UserType::Company, None) => Err(AppError::validation(
            "Company name is required for company accounts",
        )),
        (UserType::Company, Some(company_name)) => {
            let slug = slugify(company_name);
            if validate_slug(&slug).is_err() {
                return Err(AppError::validation(
                    "Company name must contain letters or digits",
                ));
            }
            Ok(())
        }
        (UserType::User, Some(_)) => Err(AppError::validation(
            "Company name is only accepted for company accounts",
        )),
        (UserType::User, None) => Ok(()),
    }
}

/// URL slug for a company name: lowercase ASCII alphanumerics joined by hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Only same-origin absolute paths that fit in a `Location` header are
/// accepted as post-confirmation targets.
pub fn safe_redirect_target(next: Option<&str>, fallback: &str) -> String {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control)
                && HeaderValue::from_str(path).is_ok() =>
        {
            path.to_string()
        }
        _ => fallback.to_string(),
    }
}
