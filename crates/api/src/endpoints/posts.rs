//! Post endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tangle_common::{AppError, AppResult};
use tangle_core::{CreatePostInput, DEFAULT_PAGE_SIZE, Page, PostStats, UpdatePostInput};
use tangle_db::entities::{post::PostCategory, user};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{self, CommentResponse, MessageResponse, PostResponse},
};

/// Category value meaning "no filter".
const ALL_CATEGORIES: &str = "ALL";

/// Listing query.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_size")]
    pub size: u64,
    pub category: Option<String>,
    pub search: Option<String>,
}

const fn default_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

fn community_of(user: &user::Model) -> AppResult<&str> {
    user.community_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("User is not a member of any community".to_string()))
}

/// List the caller's community board.
///
/// A category other than `ALL` filters; otherwise a non-blank search term
/// searches; otherwise everything is listed.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<PostResponse>>> {
    let community_id = community_of(&user)?;
    let posts = &state.post_service;

    let category = query
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let page = if let Some(category) = category {
        let category = category.parse::<PostCategory>()?;
        posts
            .list_by_community_and_category(community_id, category, query.page, query.size)
            .await?
    } else if let Some(term) = search {
        posts
            .search(community_id, term, query.page, query.size)
            .await?
    } else {
        posts
            .list_by_community(community_id, query.page, query.size)
            .await?
    };

    Ok(Json(page.map(PostResponse::from)))
}

/// Post creation response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    pub message: String,
    pub post_id: String,
    pub title: String,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreatePostInput>,
) -> AppResult<Json<CreatePostResponse>> {
    let post = state.post_service.create(&user, req).await?;

    Ok(Json(CreatePostResponse {
        message: "Post created successfully".to_string(),
        post_id: post.id,
        title: post.title,
    }))
}

async fn my_posts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PostResponse>>> {
    let posts = state.post_service.list_by_user(&user.id).await?;
    Ok(Json(response::list(posts)))
}

async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<PostStats>> {
    let community_id = community_of(&user)?;
    let stats = state.post_service.stats(community_id, &user.id).await?;
    Ok(Json(stats))
}

/// Fetch one post, counting the view.
async fn show(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.view(&id).await?;
    Ok(Json(post.into()))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdatePostInput>,
) -> AppResult<Json<PostResponse>> {
    let post = state.post_service.update(&id, &user.id, req).await?;
    Ok(Json(post.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.post_service.delete(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}

/// Comment body for a post.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

async fn add_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .post_service
        .add_comment(&id, &user.id, req.content)
        .await?;
    Ok(Json(comment.into()))
}

async fn list_comments(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.post_service.list_comments(&id).await?;
    Ok(Json(response::list(comments)))
}

/// Report body for a post.
#[derive(Debug, Deserialize)]
pub struct ReportPostRequest {
    pub reason: String,
    #[serde(rename = "type")]
    pub report_type: String,
}

async fn report(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReportPostRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .post_service
        .report(&id, &user.id, req.reason, req.report_type)
        .await?;
    Ok(Json(MessageResponse::new("Post reported successfully")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/my-posts", get(my_posts))
        .route("/stats", get(stats))
        .route("/{id}", get(show).put(update).delete(delete))
        .route("/{id}/comments", get(list_comments).post(add_comment))
        .route("/{id}/report", post(report))
}
