use uuid::Uuid;

use crate::db::enums::UserType;
use crate::middleware::auth::Session;

#[derive(Clone, Debug)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub user_type: Option<UserType>,
}

impl From<&Session> for RequestContext {
    fn from(session: &Session) -> Self {
        Self {
            user_id: session.user.id,
            user_type: session.user.user_type,
        }
    }
}
