//! User endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Serialize;
use tangle_common::AppResult;
use tangle_core::{UpdateProfileInput, UserStats};

use crate::{
    endpoints::auth::{ProfileResponse, profile_of},
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::{self, UserResponse},
};

async fn profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(profile_of(&state, user).await?))
}

#[derive(Serialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: UserResponse,
}

async fn update_profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileInput>,
) -> AppResult<Json<ProfileUpdatedResponse>> {
    let updated = state.user_service.update_profile(&user.id, req).await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".to_string(),
        user: updated.into(),
    }))
}

async fn stats(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserStats>> {
    Ok(Json(state.user_service.stats(&user.id).await?))
}

/// Members of the caller's community.
async fn community(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let members = state.user_service.community_members(&user).await?;
    Ok(Json(response::list(members)))
}

async fn verify(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.user_service.verify(&id).await?.into()))
}

async fn deactivate(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(state.user_service.deactivate(&id).await?.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile).put(update_profile))
        .route("/stats", get(stats))
        .route("/community", get(community))
        .route("/{id}/verify", put(verify))
        .route("/{id}/deactivate", put(deactivate))
}
