use chrono::NaiveDate;

use crate::db::enums::{PledgeStatus, ProjectStatus};
use crate::db::models::api::error_codes;
use crate::db::models::project::{PledgeOption, Project};
use crate::error::AppError;

/// Admission rules for a new pledge against a project option.
pub fn check_pledge_admission(
    project: &Project,
    option: &PledgeOption,
    amount: i64,
    today: NaiveDate,
) -> Result<(), AppError> {
    if option.project_id != project.id {
        return Err(AppError::validation(
            "Pledge option does not belong to this project",
        ));
    }
    if project.status != ProjectStatus::Published {
        return Err(AppError::conflict_with_code(
            "Project is not accepting pledges",
            Some("project_id".to_string()),
            error_codes::PLEDGE_PROJECT_CLOSED,
        ));
    }
    if project.end_date < today {
        return Err(AppError::conflict_with_code(
            "Project funding period has ended",
            Some("project_id".to_string()),
            error_codes::PLEDGE_PROJECT_CLOSED,
        ));
    }
    if amount < option.amount {
        return Err(AppError::validation(format!(
            "Pledge amount must be at least {}",
            option.amount
        )));
    }
    Ok(())
}

pub fn check_cancellable(status: PledgeStatus) -> Result<(), AppError> {
    if status == PledgeStatus::Pending {
        Ok(())
    } else {
        Err(AppError::conflict_with_code(
            format!("A {} pledge cannot be cancelled", status.as_str()),
            Some("status".to_string()),
            error_codes::PLEDGE_NOT_CANCELLABLE,
        ))
    }
}
