//! Comment service.

use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use tangle_common::{AppError, AppResult, IdGenerator};
use tangle_db::{
    entities::comment,
    repositories::{CommentRepository, PostRepository, UserRepository},
};
use tracing::info;
use validator::Validate;

/// Input for adding a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentInput {
    #[validate(length(min = 1, max = 64))]
    pub post_id: String,

    pub content: String,
}

/// Longest comment body, in characters.
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Trimmed comment body; blank or oversized text is rejected.
fn comment_body(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Comment must not be empty".to_string()));
    }
    if content.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(content.to_string())
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        post_repo: PostRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comments on a post, newest first.
    pub async fn list_by_post(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_post(post_id).await
    }

    /// Comments written by a user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_by_user(user_id).await
    }

    /// Add a comment to an active post.
    pub async fn add(&self, author_id: &str, input: AddCommentInput) -> AppResult<comment::Model> {
        input.validate()?;
        let content = comment_body(&input.content)?;

        let author = self.user_repo.get_by_id(author_id).await?;
        let post = self.post_repo.get_by_id(&input.post_id).await?;

        let now = Utc::now();
        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(content),
            user_id: Set(author.id),
            post_id: Set(post.id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = self.comment_repo.create(model).await?;
        info!(comment_id = %created.id, post_id = %created.post_id, "Comment added");
        Ok(created)
    }

    /// Edit a comment; only its author may.
    pub async fn update(
        &self,
        comment_id: &str,
        actor_id: &str,
        content: String,
    ) -> AppResult<comment::Model> {
        let content = comment_body(&content)?;

        let existing = self.comment_repo.get_by_id(comment_id).await?;
        if existing.user_id != actor_id {
            return Err(AppError::Forbidden(
                "Only the author can edit this comment".to_string(),
            ));
        }

        let mut active: comment::ActiveModel = existing.into();
        active.content = Set(content);
        active.updated_at = Set(Utc::now().into());
        self.comment_repo.update(active).await
    }

    /// Delete a comment; allowed for the comment author and the post author.
    pub async fn delete(&self, comment_id: &str, actor_id: &str) -> AppResult<()> {
        let existing = self.comment_repo.get_by_id(comment_id).await?;

        let allowed = existing.user_id == actor_id
            || self
                .post_repo
                .find_by_id(&existing.post_id)
                .await?
                .is_some_and(|post| post.user_id == actor_id);

        if !allowed {
            return Err(AppError::Forbidden(
                "Not allowed to delete this comment".to_string(),
            ));
        }

        self.comment_repo.delete(existing).await?;
        info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }
}
