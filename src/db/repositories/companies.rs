use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::company::{Company, NewCompany};

pub struct CompaniesRepo;

impl CompaniesRepo {
    pub fn insert(
        conn: &mut PgConnection,
        new_company: &NewCompany,
    ) -> Result<Company, diesel::result::Error> {
        diesel::insert_into(crate::schema::companies::table)
            .values(new_company)
            .returning(Company::as_returning())
            .get_result(conn)
    }

    pub fn find_by_owner(
        conn: &mut PgConnection,
        owner: Uuid,
    ) -> Result<Option<Company>, diesel::result::Error> {
        use crate::schema::companies::dsl as c;
        c::companies
            .filter(c::owner_id.eq(owner))
            .select(Company::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_slug(
        conn: &mut PgConnection,
        target_slug: &str,
    ) -> Result<Option<Company>, diesel::result::Error> {
        use crate::schema::companies::dsl as c;
        c::companies
            .filter(c::slug.eq(target_slug))
            .select(Company::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_ids(
        conn: &mut PgConnection,
        ids: &[Uuid],
    ) -> Result<Vec<Company>, diesel::result::Error> {
        use crate::schema::companies::dsl as c;
        c::companies
            .filter(c::id.eq_any(ids))
            .select(Company::as_select())
            .load(conn)
    }

    pub fn slug_exists(
        conn: &mut PgConnection,
        target_slug: &str,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::companies::dsl as c;
        diesel::select(diesel::dsl::exists(c::companies.filter(c::slug.eq(target_slug))))
            .get_result(conn)
    }
}
