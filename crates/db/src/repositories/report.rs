//! Report repository.

use std::sync::Arc;

use crate::entities::{Report, report};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use tangle_common::{AppError, AppResult};

use super::map_write_err;

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a report by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<report::Model>> {
        Report::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a report by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report not found: {id}")))
    }

    /// All reports, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<report::Model>> {
        Report::find()
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reports filed against a user.
    pub async fn find_by_reported_user(&self, user_id: &str) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::ReportedUserId.eq(user_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Reports filed against a post.
    pub async fn find_by_post(&self, post_id: &str) -> AppResult<Vec<report::Model>> {
        Report::find()
            .filter(report::Column::PostId.eq(post_id))
            .order_by_desc(report::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether `reporter_id` has already reported `post_id`.
    pub async fn exists_for_post(&self, reporter_id: &str, post_id: &str) -> AppResult<bool> {
        let count = Report::find()
            .filter(report::Column::ReporterId.eq(reporter_id))
            .filter(report::Column::PostId.eq(post_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Create a new report.
    pub async fn create(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Update a report.
    pub async fn update(&self, model: report::ActiveModel) -> AppResult<report::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::report::{ReportStatus, ReportType};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_report(id: &str, post_id: Option<&str>) -> report::Model {
        let now = Utc::now();
        report::Model {
            id: id.to_string(),
            reason: "Selling counterfeit goods".to_string(),
            report_type: ReportType::Fraud,
            status: ReportStatus::Pending,
            reporter_id: "u1".to_string(),
            post_id: post_id.map(ToString::to_string),
            reported_user_id: Some("u2".to_string()),
            admin_notes: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_post() {
        let report = create_test_report("r1", Some("p1"));

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[report]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        let result = repo.find_by_post("p1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].post_id.as_deref(), Some("p1"));
    }

    #[tokio::test]
    async fn test_exists_for_post() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(0))
                }]])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        assert!(!repo.exists_for_post("u1", "p1").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<report::Model>::new()])
                .into_connection(),
        );

        let repo = ReportRepository::new(db);
        assert!(matches!(
            repo.get_by_id("missing").await,
            Err(AppError::NotFound(_))
        ));
    }
}
