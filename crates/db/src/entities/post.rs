//! Post entity.

use std::{fmt, str::FromStr};

use sea_orm::{ActiveEnum, entity::prelude::*};
use serde::{Deserialize, Serialize};
use tangle_common::AppError;

/// Board section a post is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostCategory {
    #[sea_orm(string_value = "HELP_REQUEST")]
    HelpRequest,
    #[sea_orm(string_value = "HELP_OFFER")]
    HelpOffer,
    #[sea_orm(string_value = "BUY_SELL")]
    BuySell,
    #[sea_orm(string_value = "BUSINESS")]
    Business,
    #[sea_orm(string_value = "SERVICE")]
    Service,
    #[sea_orm(string_value = "JOB_GIG")]
    JobGig,
    #[sea_orm(string_value = "EVENT")]
    Event,
    #[sea_orm(string_value = "ANNOUNCEMENT")]
    Announcement,
    #[sea_orm(string_value = "LOST_FOUND")]
    LostFound,
    #[sea_orm(string_value = "VOLUNTEER")]
    Volunteer,
}

impl FromStr for PostCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_value(&s.to_string())
            .map_err(|_| AppError::Validation(format!("Unknown post category: {s}")))
    }
}

impl fmt::Display for PostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Whether a post asks for something, offers something, or just informs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    #[sea_orm(string_value = "REQUEST")]
    Request,
    #[sea_orm(string_value = "OFFER")]
    Offer,
    #[sea_orm(string_value = "ANNOUNCEMENT")]
    Announcement,
}

impl FromStr for PostType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_value(&s.to_string())
            .map_err(|_| AppError::Validation(format!("Unknown post type: {s}")))
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub category: PostCategory,

    #[sea_orm(column_name = "type")]
    pub post_type: PostType,

    #[sea_orm(nullable)]
    pub contact_info: Option<String>,

    #[sea_orm(nullable)]
    pub price: Option<f64>,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    /// Ordered image references (JSON array of strings).
    #[sea_orm(column_type = "JsonBinary")]
    pub images: Json,

    #[sea_orm(default_value = false)]
    pub is_urgent: bool,

    #[sea_orm(default_value = false)]
    pub is_featured: bool,

    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    /// Cleared when the author deletes the post.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Author user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    /// Copied from the author at creation time.
    #[sea_orm(indexed)]
    pub community_id: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Image references in display order.
    #[must_use]
    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_value(self.images.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::community::Entity",
        from = "Column::CommunityId",
        to = "super::community::Column::Id"
    )]
    Community,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comments,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::community::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Community.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing_is_exact() {
        assert_eq!(
            "BUY_SELL".parse::<PostCategory>().ok(),
            Some(PostCategory::BuySell)
        );
        assert!("buy_sell".parse::<PostCategory>().is_err());
        assert!("ALL".parse::<PostCategory>().is_err());
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!("OFFER".parse::<PostType>().ok(), Some(PostType::Offer));
        assert!(matches!(
            "GIVEAWAY".parse::<PostType>(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_serde_tags_match_storage() {
        assert_eq!(
            serde_json::to_string(&PostCategory::LostFound).ok().as_deref(),
            Some("\"LOST_FOUND\"")
        );
        assert_eq!(PostCategory::JobGig.to_string(), "JOB_GIG");
    }
}
