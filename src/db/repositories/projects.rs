use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::ProjectStatus;
use crate::db::models::project::{
    NewPledgeOption, NewProject, PledgeOption, Project, ProjectDetails,
};

pub struct ProjectsRepo;

impl ProjectsRepo {
    pub fn insert(
        conn: &mut PgConnection,
        new_project: &NewProject,
    ) -> Result<Project, diesel::result::Error> {
        diesel::insert_into(crate::schema::projects::table)
            .values(new_project)
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn insert_options(
        conn: &mut PgConnection,
        options: &[NewPledgeOption],
    ) -> Result<Vec<PledgeOption>, diesel::result::Error> {
        if options.is_empty() {
            return Ok(Vec::new());
        }
        diesel::insert_into(crate::schema::pledge_options::table)
            .values(options)
            .returning(PledgeOption::as_returning())
            .get_results(conn)
    }

    /// Row-locks the project for the rest of the transaction.
    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        project_id: Uuid,
    ) -> Result<Option<Project>, diesel::result::Error> {
        use crate::schema::projects::dsl as p;
        p::projects
            .filter(p::id.eq(project_id))
            .select(Project::as_select())
            .for_update()
            .first(conn)
            .optional()
    }

    /// Locking lookup scoped to the owning company.
    pub fn find_in_company_for_update(
        conn: &mut PgConnection,
        company: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Project>, diesel::result::Error> {
        use crate::schema::projects::dsl as p;
        p::projects
            .filter(p::id.eq(project_id))
            .filter(p::company_id.eq(company))
            .select(Project::as_select())
            .for_update()
            .first(conn)
            .optional()
    }

    pub fn list_by_company(
        conn: &mut PgConnection,
        company: Uuid,
    ) -> Result<Vec<Project>, diesel::result::Error> {
        use crate::schema::projects::dsl as p;
        p::projects
            .filter(p::company_id.eq(company))
            .order(p::created_at.desc())
            .select(Project::as_select())
            .load(conn)
    }

    pub fn list_by_company_with_status(
        conn: &mut PgConnection,
        company: Uuid,
        statuses: &[ProjectStatus],
    ) -> Result<Vec<Project>, diesel::result::Error> {
        use crate::schema::projects::dsl as p;
        p::projects
            .filter(p::company_id.eq(company))
            .filter(p::status.eq_any(statuses))
            .order(p::end_date.asc())
            .select(Project::as_select())
            .load(conn)
    }

    /// Attaches pledge options to each project, preserving project order.
    pub fn with_options(
        conn: &mut PgConnection,
        projects: Vec<Project>,
    ) -> Result<Vec<ProjectDetails>, diesel::result::Error> {
        use crate::schema::pledge_options::dsl as o;
        let options = PledgeOption::belonging_to(&projects)
            .order(o::amount.asc())
            .select(PledgeOption::as_select())
            .load(conn)?;

        Ok(options
            .grouped_by(&projects)
            .into_iter()
            .zip(projects)
            .map(|(pledge_options, project)| ProjectDetails {
                project,
                pledge_options,
            })
            .collect())
    }

    /// Moves the project from `current` to `new_status`. Returns `None` when the
    /// stored status is no longer `current`.
    pub fn update_status(
        conn: &mut PgConnection,
        project_id: Uuid,
        current: ProjectStatus,
        new_status: ProjectStatus,
    ) -> Result<Option<Project>, diesel::result::Error> {
        use crate::schema::projects::dsl as p;
        diesel::update(
            p::projects
                .filter(p::id.eq(project_id))
                .filter(p::status.eq(current)),
        )
        .set((p::status.eq(new_status), p::updated_at.eq(chrono::Utc::now())))
        .returning(Project::as_returning())
        .get_result(conn)
        .optional()
    }

    /// Adds `delta` (possibly negative) to the pledged total.
    pub fn adjust_pledged(
        conn: &mut PgConnection,
        project_id: Uuid,
        delta: i64,
    ) -> Result<Project, diesel::result::Error> {
        use crate::schema::projects::dsl as p;
        diesel::update(p::projects.filter(p::id.eq(project_id)))
            .set((
                p::amount_pledged.eq(p::amount_pledged + delta),
                p::updated_at.eq(chrono::Utc::now()),
            ))
            .returning(Project::as_returning())
            .get_result(conn)
    }

    pub fn find_option(
        conn: &mut PgConnection,
        option_id: Uuid,
    ) -> Result<Option<PledgeOption>, diesel::result::Error> {
        use crate::schema::pledge_options::dsl as o;
        o::pledge_options
            .filter(o::id.eq(option_id))
            .select(PledgeOption::as_select())
            .first(conn)
            .optional()
    }
}
