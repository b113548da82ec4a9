use crate::db::enums::PledgeStatus;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Queryable, Selectable, Identifiable, Serialize, Clone, Debug)]
#[diesel(table_name = crate::schema::user_project_pledges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserProjectPledge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub pledge_option_id: Uuid,
    pub amount: i64,
    pub status: PledgeStatus,
    pub payment_intent_id: Option<String>,
    pub payment_method_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_project_pledges)]
pub struct NewUserProjectPledge {
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub pledge_option_id: Uuid,
    pub amount: i64,
    pub status: PledgeStatus,
}

#[derive(Deserialize, Validate)]
pub struct CreatePledgeRequest {
    pub project_id: Uuid,
    pub pledge_option_id: Uuid,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,
}

/// Row shown on the USER dashboard.
#[derive(Serialize)]
pub struct PledgeSummary {
    #[serde(flatten)]
    pub pledge: UserProjectPledge,
    pub project_title: String,
    pub option_title: String,
    pub company: super::company::CompanySummary,
}
