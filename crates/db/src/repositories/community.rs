//! Community repository.

use std::sync::Arc;

use crate::entities::{Community, community};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};
use tangle_common::{AppError, AppResult};

use super::map_write_err;

/// Community repository for database operations.
#[derive(Clone)]
pub struct CommunityRepository {
    db: Arc<DatabaseConnection>,
}

impl CommunityRepository {
    /// Create a new community repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a community by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<community::Model>> {
        Community::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a community by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<community::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Community not found: {id}")))
    }

    /// Find a community by its join code.
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<community::Model>> {
        Community::find()
            .filter(community::Column::CommunityCode.eq(code))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a join code is already taken.
    pub async fn code_exists(&self, code: &str) -> AppResult<bool> {
        let count = Community::find()
            .filter(community::Column::CommunityCode.eq(code))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// All communities, ordered by name.
    pub async fn find_all(&self) -> AppResult<Vec<community::Model>> {
        Community::find()
            .order_by_asc(community::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Case-insensitive substring search over name, city and location.
    ///
    /// Only active communities are returned.
    pub async fn search(&self, query: &str) -> AppResult<Vec<community::Model>> {
        let pattern = format!(
            "%{}%",
            query
                .to_lowercase()
                .replace('%', "\\%")
                .replace('_', "\\_")
        );

        let matches_any = Condition::any()
            .add(Expr::expr(Func::lower(Expr::col(community::Column::Name))).like(pattern.as_str()))
            .add(Expr::expr(Func::lower(Expr::col(community::Column::City))).like(pattern.as_str()))
            .add(
                Expr::expr(Func::lower(Expr::col(community::Column::Location)))
                    .like(pattern.as_str()),
            );

        Community::find()
            .filter(community::Column::IsActive.eq(true))
            .filter(matches_any)
            .order_by_asc(community::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new community.
    pub async fn create(&self, model: community::ActiveModel) -> AppResult<community::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }
}
