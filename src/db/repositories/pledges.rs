use diesel::prelude::*;
use uuid::Uuid;

use crate::db::enums::PledgeStatus;
use crate::db::models::pledge::{NewUserProjectPledge, UserProjectPledge};
use crate::db::models::project::{PledgeOption, Project};

pub struct PledgesRepo;

impl PledgesRepo {
    pub fn insert(
        conn: &mut PgConnection,
        new_pledge: &NewUserProjectPledge,
    ) -> Result<UserProjectPledge, diesel::result::Error> {
        diesel::insert_into(crate::schema::user_project_pledges::table)
            .values(new_pledge)
            .returning(UserProjectPledge::as_returning())
            .get_result(conn)
    }

    pub fn find_for_user_for_update(
        conn: &mut PgConnection,
        owner: Uuid,
        pledge_id: Uuid,
    ) -> Result<Option<UserProjectPledge>, diesel::result::Error> {
        use crate::schema::user_project_pledges::dsl as up;
        up::user_project_pledges
            .filter(up::id.eq(pledge_id))
            .filter(up::user_id.eq(owner))
            .select(UserProjectPledge::as_select())
            .for_update()
            .first(conn)
            .optional()
    }

    /// Pledges of one user joined with their project and option, newest first.
    pub fn list_for_user(
        conn: &mut PgConnection,
        owner: Uuid,
    ) -> Result<Vec<(UserProjectPledge, Project, PledgeOption)>, diesel::result::Error> {
        use crate::schema::{pledge_options, projects, user_project_pledges as up};
        up::table
            .inner_join(projects::table)
            .inner_join(pledge_options::table)
            .filter(up::user_id.eq(owner))
            .order(up::created_at.desc())
            .select((
                UserProjectPledge::as_select(),
                Project::as_select(),
                PledgeOption::as_select(),
            ))
            .load(conn)
    }

    pub fn update_status(
        conn: &mut PgConnection,
        pledge_id: Uuid,
        new_status: PledgeStatus,
    ) -> Result<UserProjectPledge, diesel::result::Error> {
        use crate::schema::user_project_pledges::dsl as up;
        diesel::update(up::user_project_pledges.filter(up::id.eq(pledge_id)))
            .set((up::status.eq(new_status), up::updated_at.eq(chrono::Utc::now())))
            .returning(UserProjectPledge::as_returning())
            .get_result(conn)
    }
}
