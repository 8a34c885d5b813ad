//! Report service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tangle_common::{AppError, AppResult, IdGenerator};
use tangle_db::{
    entities::report::{self, ReportStatus, ReportType},
    repositories::{PostRepository, ReportRepository, UserRepository},
};
use tracing::info;
use validator::Validate;

/// Input for filing a report.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportInput {
    #[validate(length(min = 10, max = 500))]
    pub reason: String,

    /// Report type tag such as `SPAM`.
    #[serde(rename = "type")]
    pub report_type: String,

    pub post_id: Option<String>,

    pub reported_user_id: Option<String>,
}

/// Report service for business logic.
#[derive(Clone)]
pub struct ReportService {
    report_repo: ReportRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReportService {
    /// Create a new report service.
    #[must_use]
    pub const fn new(
        report_repo: ReportRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            report_repo,
            post_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// File a report against a post, a user, or both.
    ///
    /// A post reported without an explicit user implicates the post's author.
    pub async fn create(
        &self,
        reporter_id: &str,
        input: CreateReportInput,
    ) -> AppResult<report::Model> {
        input.validate()?;
        let report_type = input.report_type.parse::<ReportType>()?;

        if input.post_id.is_none() && input.reported_user_id.is_none() {
            return Err(AppError::Validation(
                "A report must reference a post or a user".to_string(),
            ));
        }

        let reporter = self.user_repo.get_by_id(reporter_id).await?;

        let post = match &input.post_id {
            Some(post_id) => Some(self.post_repo.get_by_id(post_id).await?),
            None => None,
        };

        let reported_user_id = match input.reported_user_id {
            Some(user_id) => Some(self.user_repo.get_by_id(&user_id).await?.id),
            None => post.as_ref().map(|p| p.user_id.clone()),
        };

        if let Some(post) = &post {
            if self.report_repo.exists_for_post(&reporter.id, &post.id).await? {
                return Err(AppError::Conflict(
                    "You have already reported this post".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let model = report::ActiveModel {
            id: Set(self.id_gen.generate()),
            reason: Set(input.reason),
            report_type: Set(report_type),
            status: Set(ReportStatus::Pending),
            reporter_id: Set(reporter.id),
            post_id: Set(post.map(|p| p.id)),
            reported_user_id: Set(reported_user_id),
            admin_notes: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = self.report_repo.create(model).await?;
        info!(report_id = %created.id, report_type = %created.report_type, "Report filed");
        Ok(created)
    }

    /// All reports, newest first.
    pub async fn list_all(&self) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_all().await
    }

    /// Get a report by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<report::Model> {
        self.report_repo.get_by_id(id).await
    }

    /// Reports filed against a user.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_reported_user(user_id).await
    }

    /// Reports filed against a post.
    pub async fn list_by_post(&self, post_id: &str) -> AppResult<Vec<report::Model>> {
        self.report_repo.find_by_post(post_id).await
    }

    /// Move a report to a new status, optionally recording moderator notes.
    pub async fn update_status(
        &self,
        id: &str,
        status: &str,
        admin_notes: Option<String>,
    ) -> AppResult<report::Model> {
        let status = status.parse::<ReportStatus>()?;
        let existing = self.report_repo.get_by_id(id).await?;

        let mut active: report::ActiveModel = existing.into();
        active.status = Set(status);
        if let Some(notes) = admin_notes {
            active.admin_notes = Set(Some(notes));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = self.report_repo.update(active).await?;
        info!(report_id = %updated.id, status = %updated.status, "Report status updated");
        Ok(updated)
    }
}
