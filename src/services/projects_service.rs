use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::enums::ProjectStatus,
    db::models::api::error_codes,
    db::models::company::{Company, CompanyPage},
    db::models::project::{
        CreateProjectRequest, NewPledgeOption, NewProject, Project, ProjectDetails,
        ProjectWithCompany,
    },
    db::repositories::{CompaniesRepo, ProjectsRepo},
    error::AppError,
    services::context::RequestContext,
    validation::project::{validate_create_project, validate_status_transition},
};

pub struct ProjectsService;

impl ProjectsService {
    /// The company owned by the calling COMPANY user.
    pub fn company_for(conn: &mut PgConnection, ctx: &RequestContext) -> Result<Company, AppError> {
        CompaniesRepo::find_by_owner(conn, ctx.user_id)?
            .ok_or_else(|| AppError::not_found("Company"))
    }

    pub fn list_for_company(
        conn: &mut PgConnection,
        ctx: &RequestContext,
    ) -> Result<(Company, Vec<ProjectDetails>), AppError> {
        let company = Self::company_for(conn, ctx)?;
        let projects = ProjectsRepo::list_by_company(conn, company.id)?;
        let details = ProjectsRepo::with_options(conn, projects)?;
        Ok((company, details))
    }

    /// New projects start as drafts.
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        req: &CreateProjectRequest,
        today: NaiveDate,
    ) -> Result<ProjectDetails, AppError> {
        validate_create_project(req, today)?;
        let company = Self::company_for(conn, ctx)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let project = ProjectsRepo::insert(
                conn,
                &NewProject {
                    company_id: company.id,
                    title: req.title.trim().to_string(),
                    description: req.description.clone(),
                    goal: req.goal,
                    end_date: req.end_date,
                    status: ProjectStatus::Draft,
                },
            )?;

            let options: Vec<NewPledgeOption> = req
                .pledge_options
                .iter()
                .map(|option| NewPledgeOption {
                    project_id: project.id,
                    title: option.title.trim().to_string(),
                    amount: option.amount,
                    benefits: option.benefits.clone(),
                })
                .collect();
            let mut pledge_options = ProjectsRepo::insert_options(conn, &options)?;
            pledge_options.sort_by_key(|option| option.amount);

            Ok(ProjectDetails {
                project,
                pledge_options,
            })
        })
    }

    /// Applies a status change under a row lock, so concurrent transitions
    /// are checked against the status the winner left behind.
    pub fn transition(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        project_id: Uuid,
        next: ProjectStatus,
    ) -> Result<Project, AppError> {
        let company = Self::company_for(conn, ctx)?;

        conn.transaction::<_, AppError, _>(|conn| {
            let project = ProjectsRepo::find_in_company_for_update(conn, company.id, project_id)?
                .ok_or_else(|| AppError::not_found("Project"))?;

            validate_status_transition(project.status, next)?;

            let updated = ProjectsRepo::update_status(conn, project.id, project.status, next)?
                .ok_or_else(|| stale_transition(project.status, next))?;
            tracing::info!(
                project_id = %updated.id,
                from = project.status.as_str(),
                to = next.as_str(),
                "Project status changed"
            );
            Ok(updated)
        })
    }

    /// Public company page: published and completed projects only.
    pub fn public_page(conn: &mut PgConnection, slug: &str) -> Result<CompanyPage, AppError> {
        let company = CompaniesRepo::find_by_slug(conn, slug)?
            .ok_or_else(|| AppError::not_found("Company"))?;

        let projects = ProjectsRepo::list_by_company_with_status(
            conn,
            company.id,
            &[ProjectStatus::Published, ProjectStatus::Completed],
        )?;
        let summary = company.summary();
        let projects = ProjectsRepo::with_options(conn, projects)?
            .into_iter()
            .map(|project| ProjectWithCompany {
                project,
                company: summary.clone(),
            })
            .collect();

        Ok(CompanyPage {
            company: summary,
            projects,
        })
    }
}

fn stale_transition(from: ProjectStatus, to: ProjectStatus) -> AppError {
    AppError::conflict_with_code(
        format!(
            "Project is no longer {}; cannot move it to {}",
            from.as_str(),
            to.as_str()
        ),
        Some("status".to_string()),
        error_codes::PROJECT_INVALID_TRANSITION,
    )
}
