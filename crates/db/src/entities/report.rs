//! Report entity.

use std::{fmt, str::FromStr};

use sea_orm::{ActiveEnum, entity::prelude::*};
use serde::{Deserialize, Serialize};
use tangle_common::AppError;

/// Reason class chosen by the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    #[sea_orm(string_value = "SPAM")]
    Spam,
    #[sea_orm(string_value = "INAPPROPRIATE_CONTENT")]
    InappropriateContent,
    #[sea_orm(string_value = "HARASSMENT")]
    Harassment,
    #[sea_orm(string_value = "FRAUD")]
    Fraud,
    #[sea_orm(string_value = "MISINFORMATION")]
    Misinformation,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

impl FromStr for ReportType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_value(&s.to_string())
            .map_err(|_| AppError::Validation(format!("Unknown report type: {s}")))
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Moderation state of a report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    #[sea_orm(string_value = "UNDER_REVIEW")]
    UnderReview,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "DISMISSED")]
    Dismissed,
}

impl FromStr for ReportStatus {
    type Err = AppError;

    /// Case-insensitive; moderators send `resolved` as often as `RESOLVED`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_value(&s.trim().to_uppercase())
            .map_err(|_| AppError::Validation(format!("Invalid report status: {s}")))
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

    #[sea_orm(column_name = "type")]
    pub report_type: ReportType,

    pub status: ReportStatus,

    #[sea_orm(indexed)]
    pub reporter_id: String,

    #[sea_orm(nullable, indexed)]
    pub post_id: Option<String>,

    #[sea_orm(nullable, indexed)]
    pub reported_user_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id"
    )]
    Reporter,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReportedUserId",
        to = "super::user::Column::Id"
    )]
    ReportedUser,

    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    ReportedPost,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReportedPost.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
