use chrono::NaiveDate;
use diesel::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::enums::PledgeStatus,
    db::models::pledge::{
        CreatePledgeRequest, NewUserProjectPledge, PledgeSummary, UserProjectPledge,
    },
    db::repositories::{CompaniesRepo, PledgesRepo, ProjectsRepo},
    error::AppError,
    services::context::RequestContext,
    validation::pledge::{check_cancellable, check_pledge_admission},
};

pub struct PledgesService;

impl PledgesService {
    pub fn list_for_user(
        conn: &mut PgConnection,
        ctx: &RequestContext,
    ) -> Result<Vec<PledgeSummary>, AppError> {
        let rows = PledgesRepo::list_for_user(conn, ctx.user_id)?;

        let mut company_ids: Vec<Uuid> = rows.iter().map(|(_, project, _)| project.company_id).collect();
        company_ids.sort();
        company_ids.dedup();
        let companies: HashMap<Uuid, _> = CompaniesRepo::find_by_ids(conn, &company_ids)?
            .into_iter()
            .map(|company| (company.id, company.summary()))
            .collect();

        rows.into_iter()
            .map(|(pledge, project, option)| -> Result<PledgeSummary, AppError> {
                let company = companies
                    .get(&project.company_id)
                    .cloned()
                    .ok_or_else(|| AppError::internal("Project references a missing company"))?;
                Ok(PledgeSummary {
                    pledge,
                    project_title: project.title,
                    option_title: option.title,
                    company,
                })
            })
            .collect()
    }

    /// Records a pending pledge and adds it to the project total atomically.
    pub fn create(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        req: &CreatePledgeRequest,
        today: NaiveDate,
    ) -> Result<UserProjectPledge, AppError> {
        conn.transaction::<_, AppError, _>(|conn| {
            let project = ProjectsRepo::find_by_id_for_update(conn, req.project_id)?
                .ok_or_else(|| AppError::not_found("Project"))?;
            let option = ProjectsRepo::find_option(conn, req.pledge_option_id)?
                .ok_or_else(|| AppError::not_found("Pledge option"))?;

            check_pledge_admission(&project, &option, req.amount, today)?;

            let pledge = PledgesRepo::insert(
                conn,
                &NewUserProjectPledge {
                    user_id: ctx.user_id,
                    project_id: project.id,
                    pledge_option_id: option.id,
                    amount: req.amount,
                    status: PledgeStatus::Pending,
                },
            )?;
            ProjectsRepo::adjust_pledged(conn, project.id, pledge.amount)?;

            tracing::info!(
                pledge_id = %pledge.id,
                project_id = %project.id,
                amount = pledge.amount,
                "Pledge created"
            );
            Ok(pledge)
        })
    }

    /// Cancels one of the caller's pending pledges and releases its amount.
    pub fn cancel(
        conn: &mut PgConnection,
        ctx: &RequestContext,
        pledge_id: Uuid,
    ) -> Result<UserProjectPledge, AppError> {
        conn.transaction::<_, AppError, _>(|conn| {
            let pledge = PledgesRepo::find_for_user_for_update(conn, ctx.user_id, pledge_id)?
                .ok_or_else(|| AppError::not_found("Pledge"))?;

            check_cancellable(pledge.status)?;

            ProjectsRepo::find_by_id_for_update(conn, pledge.project_id)?
                .ok_or_else(|| AppError::not_found("Project"))?;
            let cancelled = PledgesRepo::update_status(conn, pledge.id, PledgeStatus::Cancelled)?;
            if pledge.status.counts_towards_total() {
                ProjectsRepo::adjust_pledged(conn, pledge.project_id, -pledge.amount)?;
            }

            tracing::info!(pledge_id = %cancelled.id, "Pledge cancelled");
            Ok(cancelled)
        })
    }
}
