//! User repository.

use std::sync::Arc;

use crate::entities::{Comment, Post, User, post, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, sea_query::Expr,
};
use tangle_common::{AppError, AppResult};

use super::map_write_err;

/// Activity totals for a single user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserAggregates {
    pub total_posts: u64,
    pub total_views: i64,
    /// Comments left on this user's posts, by anyone.
    pub total_comments: u64,
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User not found: {id}")))
    }

    /// Find the user whose email or phone number equals `identifier`.
    pub async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(identifier))
                    .add(user::Column::PhoneNumber.eq(identifier)),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an email is already registered.
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(user::Column::Email.eq(email))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Check whether a phone number is already registered.
    pub async fn phone_exists(&self, phone_number: &str) -> AppResult<bool> {
        let count = User::find()
            .filter(user::Column::PhoneNumber.eq(phone_number))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Members of a community, newest first.
    pub async fn find_by_community(&self, community_id: &str) -> AppResult<Vec<user::Model>> {
        User::find()
            .filter(user::Column::CommunityId.eq(community_id))
            .order_by_desc(user::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count members of a community.
    pub async fn count_by_community(&self, community_id: &str) -> AppResult<u64> {
        User::find()
            .filter(user::Column::CommunityId.eq(community_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<u64> {
        User::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Post, view and comment totals for a user.
    pub async fn aggregates(&self, user_id: &str) -> AppResult<UserAggregates> {
        let total_posts = Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total_views = Post::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(view_count), 0)"), "total_views")
            .filter(post::Column::UserId.eq(user_id))
            .into_tuple::<i64>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .unwrap_or(0);

        let total_comments = Comment::find()
            .join(
                JoinType::InnerJoin,
                crate::entities::comment::Relation::Post.def(),
            )
            .filter(post::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(UserAggregates {
            total_posts,
            total_views,
            total_comments,
        })
    }
}
