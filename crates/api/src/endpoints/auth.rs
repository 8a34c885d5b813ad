//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tangle_common::AppResult;
use tangle_core::RegisterInput;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{CommunitySummary, UserResponse},
};

/// Registration response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Create a new resident account bound to a community.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<Json<RegisterResponse>> {
    let user = state.user_service.register(req).await?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user_id: user.id,
        full_name: user.full_name,
        email: user.email,
        phone_number: user.phone_number,
    }))
}

/// Login request. The identifier is an email address or a phone number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "identifier", alias = "email", alias = "phoneNumber")]
    pub email_or_phone: String,
    #[serde(default)]
    pub password: String,
}

/// Login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    pub user: UserResponse,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .user_service
        .login(&req.email_or_phone, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        token_type: "Bearer".to_string(),
        user: user.into(),
    }))
}

/// Profile of the caller, with a summary of their community.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<CommunitySummary>,
}

async fn profile(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(profile_of(&state, user).await?))
}

/// Build a profile body, resolving the user's community when they have one.
pub(crate) async fn profile_of(
    state: &AppState,
    user: tangle_db::entities::user::Model,
) -> AppResult<ProfileResponse> {
    let community = match &user.community_id {
        Some(id) => Some(state.community_service.get_by_id(id).await?.into()),
        None => None,
    };

    Ok(ProfileResponse {
        user: user.into(),
        community,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}
