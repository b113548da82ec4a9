use diesel::prelude::*;
use uuid::Uuid;

use crate::db::models::auth::{NewUser, User};

pub struct UsersRepo;

impl UsersRepo {
    pub fn find_by_email(
        conn: &mut PgConnection,
        target_email: &str,
    ) -> Result<Option<User>, diesel::result::Error> {
        use crate::schema::users::dsl as u;
        u::users
            .filter(u::email.eq(target_email))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_id(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<Option<User>, diesel::result::Error> {
        use crate::schema::users::dsl as u;
        u::users
            .filter(u::id.eq(user_id))
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn exists_by_email(
        conn: &mut PgConnection,
        target_email: &str,
    ) -> Result<bool, diesel::result::Error> {
        use crate::schema::users::dsl as u;
        diesel::select(diesel::dsl::exists(u::users.filter(u::email.eq(target_email))))
            .get_result(conn)
    }

    pub fn insert(conn: &mut PgConnection, new_user: &NewUser) -> Result<User, diesel::result::Error> {
        diesel::insert_into(crate::schema::users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn mark_email_confirmed(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> Result<User, diesel::result::Error> {
        use crate::schema::users::dsl as u;
        let now = chrono::Utc::now();
        diesel::update(u::users.filter(u::id.eq(user_id)))
            .set((
                u::email_confirmed_at.eq(Some(now)),
                u::updated_at.eq(now),
            ))
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn update_name(
        conn: &mut PgConnection,
        user_id: Uuid,
        new_name: &str,
    ) -> Result<User, diesel::result::Error> {
        use crate::schema::users::dsl as u;
        diesel::update(u::users.filter(u::id.eq(user_id)))
            .set((u::name.eq(new_name), u::updated_at.eq(chrono::Utc::now())))
            .returning(User::as_returning())
            .get_result(conn)
    }
}
