//! User entity.

use std::{fmt, str::FromStr};

use sea_orm::{ActiveEnum, entity::prelude::*};
use serde::{Deserialize, Serialize};
use tangle_common::AppError;

/// Role a resident registers with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[sea_orm(string_value = "RESIDENT")]
    #[default]
    Resident,
    #[sea_orm(string_value = "BUSINESS_OWNER")]
    BusinessOwner,
    #[sea_orm(string_value = "SERVICE_PROVIDER")]
    ServiceProvider,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_value(&s.to_string())
            .map_err(|_| AppError::Validation(format!("Unknown user role: {s}")))
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub full_name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(unique)]
    pub phone_number: String,

    /// Argon2 PHC string.
    #[serde(skip_serializing)]
    pub password_hash: String,

    pub role: UserRole,

    pub address: String,

    pub locality: String,

    pub pincode: String,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = false)]
    pub is_verified: bool,

    #[sea_orm(nullable)]
    pub profile_picture: Option<String>,

    /// NULL until the user is bound to a community.
    #[sea_orm(nullable, indexed)]
    pub community_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::community::Entity",
        from = "Column::CommunityId",
        to = "super::community::Column::Id"
    )]
    Community,

    #[sea_orm(has_many = "super::post::Entity")]
    Posts,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::community::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Community.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
