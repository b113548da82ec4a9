use chrono::NaiveDate;

use crate::db::enums::ProjectStatus;
use crate::db::models::project::CreateProjectRequest;
use crate::error::AppError;

pub const MAX_PLEDGE_OPTIONS: usize = 20;

pub fn validate_create_project(req: &CreateProjectRequest, today: NaiveDate) -> Result<(), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::validation("Project title is required"));
    }
    if req.goal <= 0 {
        return Err(AppError::validation("Project goal must be positive"));
    }
    if req.end_date <= today {
        return Err(AppError::validation("Project end date must be in the future"));
    }
    if req.pledge_options.len() > MAX_PLEDGE_OPTIONS {
        return Err(AppError::validation(format!(
            "A project can have at most {} pledge options",
            MAX_PLEDGE_OPTIONS
        )));
    }
    for option in &req.pledge_options {
        if option.title.trim().is_empty() {
            return Err(AppError::validation("Pledge option title is required"));
        }
        if option.amount <= 0 {
            return Err(AppError::validation("Pledge option amount must be positive"));
        }
    }
    Ok(())
}

pub fn validate_status_transition(
    current: ProjectStatus,
    next: ProjectStatus,
) -> Result<(), AppError> {
    if current.can_transition_to(next) {
        Ok(())
    } else {
        Err(AppError::conflict_with_code(
            format!(
                "Project cannot move from {} to {}",
                current.as_str(),
                next.as_str()
            ),
            Some("status".to_string()),
            crate::db::models::api::error_codes::PROJECT_INVALID_TRANSITION,
        ))
    }
}
