//! Post repository.

use std::sync::Arc;

use crate::entities::{Post, post, post::PostCategory};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, Func},
};
use tangle_common::{AppError, AppResult};

use super::map_write_err;

/// Aggregate counters over a community's active posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostAggregates {
    pub total_posts: u64,
    pub urgent_posts: u64,
    pub total_views: i64,
    pub posts_this_week: u64,
    pub posts_this_month: u64,
    pub my_posts: u64,
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a post by ID, including soft-deleted ones.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<post::Model>> {
        Post::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an active post by ID, returning an error if absent or deleted.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.find_by_id(id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Post not found: {id}")))
    }

    fn community_scope(community_id: &str) -> Select<Post> {
        Post::find()
            .filter(post::Column::CommunityId.eq(community_id))
            .filter(post::Column::IsActive.eq(true))
    }

    /// One page of a community's active posts, newest first.
    ///
    /// Returns the page and the total number of matching posts. `page` is
    /// zero-based. A `search` term matches title or description, ignoring case.
    pub async fn find_page(
        &self,
        community_id: &str,
        category: Option<PostCategory>,
        search: Option<&str>,
        page: u64,
        size: u64,
    ) -> AppResult<(Vec<post::Model>, u64)> {
        // OFFSET and LIMIT are bound as signed 64-bit integers.
        let offset = page
            .checked_mul(size)
            .filter(|offset| i64::try_from(*offset).is_ok() && i64::try_from(size).is_ok())
            .ok_or_else(|| AppError::BadRequest(format!("Page {page} is out of range")))?;

        let mut query = Self::community_scope(community_id);

        if let Some(category) = category {
            query = query.filter(post::Column::Category.eq(category));
        }

        if let Some(term) = search {
            let pattern = format!(
                "%{}%",
                term.to_lowercase().replace('%', "\\%").replace('_', "\\_")
            );
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                            .like(pattern.as_str()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(post::Column::Description)))
                            .like(pattern.as_str()),
                    ),
            );
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let posts = query
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(size)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((posts, total))
    }

    /// Every active post by a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<post::Model>> {
        Post::find()
            .filter(post::Column::UserId.eq(user_id))
            .filter(post::Column::IsActive.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new post.
    pub async fn create(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Update a post.
    pub async fn update(&self, model: post::ActiveModel) -> AppResult<post::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Increment view count atomically (single UPDATE query, no fetch).
    pub async fn increment_view_count(&self, id: &str) -> AppResult<()> {
        Post::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn count(&self, query: Select<Post>) -> AppResult<u64> {
        query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Counters for a community's post board, with `user_id`'s own share.
    pub async fn aggregates(
        &self,
        community_id: &str,
        user_id: &str,
        week_start: DateTime<Utc>,
        month_start: DateTime<Utc>,
    ) -> AppResult<PostAggregates> {
        let total_posts = self.count(Self::community_scope(community_id)).await?;

        let urgent_posts = self
            .count(Self::community_scope(community_id).filter(post::Column::IsUrgent.eq(true)))
            .await?;

        let total_views = Self::community_scope(community_id)
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(view_count), 0)"), "total_views")
            .into_tuple::<i64>()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .unwrap_or(0);

        let posts_this_week = self
            .count(Self::community_scope(community_id).filter(post::Column::CreatedAt.gte(week_start)))
            .await?;

        let posts_this_month = self
            .count(
                Self::community_scope(community_id).filter(post::Column::CreatedAt.gte(month_start)),
            )
            .await?;

        let my_posts = self
            .count(Self::community_scope(community_id).filter(post::Column::UserId.eq(user_id)))
            .await?;

        Ok(PostAggregates {
            total_posts,
            urgent_posts,
            total_views,
            posts_this_week,
            posts_this_month,
            my_posts,
        })
    }
}
