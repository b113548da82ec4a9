use crate::db::enums::ProjectStatus;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Project models
#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Project {
    pub id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal: i64,
    pub amount_pledged: i64,
    pub end_date: chrono::NaiveDate,
    pub status: ProjectStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::projects)]
pub struct NewProject {
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub goal: i64,
    pub end_date: chrono::NaiveDate,
    pub status: ProjectStatus,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Serialize, Clone, Debug)]
#[diesel(belongs_to(Project))]
#[diesel(table_name = crate::schema::pledge_options)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PledgeOption {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub amount: i64,
    pub benefits: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::pledge_options)]
pub struct NewPledgeOption {
    pub project_id: Uuid,
    pub title: String,
    pub amount: i64,
    pub benefits: Vec<String>,
}

/// A project together with its pledge options.
#[derive(Serialize, Clone, Debug)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub pledge_options: Vec<PledgeOption>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ProjectWithCompany {
    #[serde(flatten)]
    pub project: ProjectDetails,
    pub company: super::company::CompanySummary,
}

// Project API DTOs
#[derive(Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, message = "Goal must be positive"))]
    pub goal: i64,
    pub end_date: chrono::NaiveDate,
    #[serde(default)]
    pub pledge_options: Vec<PledgeOptionInput>,
}

#[derive(Deserialize, Clone)]
pub struct PledgeOptionInput {
    pub title: String,
    pub amount: i64,
    #[serde(default)]
    pub benefits: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateProjectStatusRequest {
    pub status: ProjectStatus,
}
