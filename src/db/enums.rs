use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Role discriminator deciding which dashboard a session may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Company,
    User,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Company, UserType::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Company => "company",
            UserType::User => "user",
        }
    }

    /// Landing dashboard for this role.
    pub fn dashboard_route(&self) -> &'static str {
        match self {
            UserType::Company => "/dashboard/company",
            UserType::User => "/dashboard/user",
        }
    }
}

impl FromSql<Text, Pg> for UserType {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "company" => Ok(UserType::Company),
            "user" => Ok(UserType::User),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<Text, Pg> for UserType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Draft,
    Published,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Published => "published",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }

    /// Publicly listed on the company page.
    pub fn is_public(&self) -> bool {
        matches!(self, ProjectStatus::Published | ProjectStatus::Completed)
    }

    pub fn can_transition_to(&self, next: ProjectStatus) -> bool {
        matches!(
            (self, next),
            (ProjectStatus::Draft, ProjectStatus::Published)
                | (ProjectStatus::Draft, ProjectStatus::Cancelled)
                | (ProjectStatus::Published, ProjectStatus::Completed)
                | (ProjectStatus::Published, ProjectStatus::Cancelled)
        )
    }
}

impl FromSql<Text, Pg> for ProjectStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "draft" => Ok(ProjectStatus::Draft),
            "published" => Ok(ProjectStatus::Published),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<Text, Pg> for ProjectStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum PledgeStatus {
    Pending,
    Confirmed,
    Failed,
    Cancelled,
    Refunded,
}

impl PledgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PledgeStatus::Pending => "pending",
            PledgeStatus::Confirmed => "confirmed",
            PledgeStatus::Failed => "failed",
            PledgeStatus::Cancelled => "cancelled",
            PledgeStatus::Refunded => "refunded",
        }
    }

    /// Whether the pledge still counts towards the project's pledged total.
    pub fn counts_towards_total(&self) -> bool {
        matches!(self, PledgeStatus::Pending | PledgeStatus::Confirmed)
    }
}

impl FromSql<Text, Pg> for PledgeStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "pending" => Ok(PledgeStatus::Pending),
            "confirmed" => Ok(PledgeStatus::Confirmed),
            "failed" => Ok(PledgeStatus::Failed),
            "cancelled" => Ok(PledgeStatus::Cancelled),
            "refunded" => Ok(PledgeStatus::Refunded),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl ToSql<Text, Pg> for PledgeStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}
