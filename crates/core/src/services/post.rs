//! Post service.

use chrono::{Duration, Utc};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tangle_common::{AppError, AppResult, IdGenerator};
use tangle_db::{
    entities::{
        comment,
        post::{self, PostCategory, PostType},
        report, user,
    },
    repositories::{PostRepository, UserRepository},
};
use tracing::info;
use validator::Validate;

use super::{
    comment::{AddCommentInput, CommentService},
    report::{CreateReportInput, ReportService},
};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Input for creating a post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1, max = 5000))]
    pub description: String,

    pub category: String,

    #[serde(rename = "type")]
    pub post_type: String,

    #[validate(length(max = 256))]
    pub contact_info: Option<String>,

    #[validate(range(min = 0.0))]
    pub price: Option<f64>,

    #[validate(length(max = 256))]
    pub location: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub is_urgent: bool,

    #[serde(default)]
    pub is_featured: bool,
}

/// Partial post update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,

    pub category: Option<String>,

    #[serde(rename = "type")]
    pub post_type: Option<String>,

    #[validate(length(max = 256))]
    pub contact_info: Option<String>,

    #[validate(range(min = 0.0))]
    pub price: Option<f64>,

    #[validate(length(max = 256))]
    pub location: Option<String>,

    pub images: Option<Vec<String>>,

    pub is_urgent: Option<bool>,

    pub is_featured: Option<bool>,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    fn new(content: Vec<T>, page: u64, size: u64, total_elements: u64) -> Self {
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages: total_elements.div_ceil(size.max(1)),
        }
    }

    /// Convert every item, keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

/// Community board counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    pub total_posts: u64,
    pub urgent_posts: u64,
    pub total_views: i64,
    pub posts_this_week: u64,
    pub posts_this_month: u64,
    pub my_posts: u64,
    pub community_members: u64,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    comments: CommentService,
    reports: ReportService,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        comments: CommentService,
        reports: ReportService,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            comments,
            reports,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a post in the author's community.
    pub async fn create(
        &self,
        author: &user::Model,
        input: CreatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;
        let category = input.category.parse::<PostCategory>()?;
        let post_type = input.post_type.parse::<PostType>()?;

        let community_id = author.community_id.clone().ok_or_else(|| {
            AppError::Validation("Join a community before posting".to_string())
        })?;

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            title: Set(input.title),
            description: Set(input.description),
            category: Set(category),
            post_type: Set(post_type),
            contact_info: Set(input.contact_info),
            price: Set(input.price),
            location: Set(input.location),
            images: Set(serde_json::json!(input.images)),
            is_urgent: Set(input.is_urgent),
            is_featured: Set(input.is_featured),
            view_count: Set(0),
            is_active: Set(true),
            user_id: Set(author.id.clone()),
            community_id: Set(community_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.post_repo.create(model).await?;
        info!(post_id = %created.id, community_id = %created.community_id, "Post created");
        Ok(created)
    }

    /// Get an active post by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(id).await
    }

    /// Fetch a post for display, counting the view.
    pub async fn view(&self, id: &str) -> AppResult<post::Model> {
        let mut post = self.post_repo.get_by_id(id).await?;
        self.post_repo.increment_view_count(id).await?;
        post.view_count += 1;
        Ok(post)
    }

    /// A community's active posts, newest first.
    pub async fn list_by_community(
        &self,
        community_id: &str,
        page: u64,
        size: u64,
    ) -> AppResult<Page<post::Model>> {
        self.page_of(community_id, None, None, page, size).await
    }

    /// A community's active posts in one category, newest first.
    pub async fn list_by_community_and_category(
        &self,
        community_id: &str,
        category: PostCategory,
        page: u64,
        size: u64,
    ) -> AppResult<Page<post::Model>> {
        self.page_of(community_id, Some(category), None, page, size)
            .await
    }

    /// A community's active posts whose title or description contain `term`.
    pub async fn search(
        &self,
        community_id: &str,
        term: &str,
        page: u64,
        size: u64,
    ) -> AppResult<Page<post::Model>> {
        self.page_of(community_id, None, Some(term), page, size)
            .await
    }

    async fn page_of(
        &self,
        community_id: &str,
        category: Option<PostCategory>,
        search: Option<&str>,
        page: u64,
        size: u64,
    ) -> AppResult<Page<post::Model>> {
        let size = size.clamp(1, MAX_PAGE_SIZE);
        let (posts, total) = self
            .post_repo
            .find_page(community_id, category, search, page, size)
            .await?;
        Ok(Page::new(posts, page, size, total))
    }

    /// Every active post by a user, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<post::Model>> {
        self.post_repo.find_by_user(user_id).await
    }

    /// Board counters for a community, with the viewer's own post count.
    pub async fn stats(&self, community_id: &str, user_id: &str) -> AppResult<PostStats> {
        let now = Utc::now();
        let totals = self
            .post_repo
            .aggregates(
                community_id,
                user_id,
                now - Duration::days(7),
                now - Duration::days(30),
            )
            .await?;
        let community_members = self.user_repo.count_by_community(community_id).await?;

        Ok(PostStats {
            total_posts: totals.total_posts,
            urgent_posts: totals.urgent_posts,
            total_views: totals.total_views,
            posts_this_week: totals.posts_this_week,
            posts_this_month: totals.posts_this_month,
            my_posts: totals.my_posts,
            community_members,
        })
    }

    /// Edit a post; only its author may.
    pub async fn update(
        &self,
        id: &str,
        actor_id: &str,
        input: UpdatePostInput,
    ) -> AppResult<post::Model> {
        input.validate()?;
        let category = input
            .category
            .as_deref()
            .map(str::parse::<PostCategory>)
            .transpose()?;
        let post_type = input
            .post_type
            .as_deref()
            .map(str::parse::<PostType>)
            .transpose()?;

        let existing = self.owned_post(id, actor_id).await?;
        let mut active: post::ActiveModel = existing.into();

        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category) = category {
            active.category = Set(category);
        }
        if let Some(post_type) = post_type {
            active.post_type = Set(post_type);
        }
        if let Some(contact_info) = input.contact_info {
            active.contact_info = Set(Some(contact_info));
        }
        if let Some(price) = input.price {
            active.price = Set(Some(price));
        }
        if let Some(location) = input.location {
            active.location = Set(Some(location));
        }
        if let Some(images) = input.images {
            active.images = Set(serde_json::json!(images));
        }
        if let Some(is_urgent) = input.is_urgent {
            active.is_urgent = Set(is_urgent);
        }
        if let Some(is_featured) = input.is_featured {
            active.is_featured = Set(is_featured);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.post_repo.update(active).await
    }

    /// Soft-delete a post; only its author may.
    pub async fn delete(&self, id: &str, actor_id: &str) -> AppResult<()> {
        let existing = self.owned_post(id, actor_id).await?;

        let mut active: post::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.updated_at = Set(Some(Utc::now().into()));
        self.post_repo.update(active).await?;

        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn owned_post(&self, id: &str, actor_id: &str) -> AppResult<post::Model> {
        let post = self.post_repo.get_by_id(id).await?;
        if post.user_id != actor_id {
            return Err(AppError::Forbidden(
                "Only the author can modify this post".to_string(),
            ));
        }
        Ok(post)
    }

    /// Comment on a post.
    pub async fn add_comment(
        &self,
        post_id: &str,
        author_id: &str,
        content: String,
    ) -> AppResult<comment::Model> {
        self.comments
            .add(
                author_id,
                AddCommentInput {
                    post_id: post_id.to_string(),
                    content,
                },
            )
            .await
    }

    /// Comments on a post, newest first.
    pub async fn list_comments(&self, post_id: &str) -> AppResult<Vec<comment::Model>> {
        self.comments.list_by_post(post_id).await
    }

    /// Report a post; its author becomes the reported user.
    pub async fn report(
        &self,
        post_id: &str,
        reporter_id: &str,
        reason: String,
        report_type: String,
    ) -> AppResult<report::Model> {
        self.reports
            .create(
                reporter_id,
                CreateReportInput {
                    reason,
                    report_type,
                    post_id: Some(post_id.to_string()),
                    reported_user_id: None,
                },
            )
            .await
    }
}
