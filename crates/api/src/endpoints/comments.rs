//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use serde::Deserialize;
use tangle_common::AppResult;
use tangle_core::AddCommentInput;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{self, CommentResponse, MessageResponse},
};

async fn by_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_by_post(&post_id).await?;
    Ok(Json(response::list(comments)))
}

async fn by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<CommentResponse>>> {
    let comments = state.comment_service.list_by_user(&user_id).await?;
    Ok(Json(response::list(comments)))
}

async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddCommentInput>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state.comment_service.add(&user.id, req).await?;
    Ok(Json(comment.into()))
}

/// Comment edit body.
#[derive(Debug, Deserialize)]
pub struct EditCommentRequest {
    pub content: String,
}

async fn edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EditCommentRequest>,
) -> AppResult<Json<CommentResponse>> {
    let comment = state
        .comment_service
        .update(&id, &user.id, req.content)
        .await?;
    Ok(Json(comment.into()))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.comment_service.delete(&id, &user.id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(add))
        .route("/post/{post_id}", get(by_post))
        .route("/user/{user_id}", get(by_user))
        .route("/{id}", put(edit).delete(delete))
}
