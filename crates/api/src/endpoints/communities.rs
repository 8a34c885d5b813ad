//! Community directory endpoints. All public.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use tangle_common::AppResult;
use tangle_core::CreateCommunityInput;

use crate::{
    middleware::AppState,
    response::{self, CommunityResponse},
};

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<CommunityResponse>>> {
    let communities = state.community_service.list_all().await?;
    Ok(Json(response::list(communities)))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<CommunityResponse>>> {
    let communities = state.community_service.search(&params.query).await?;
    Ok(Json(response::list(communities)))
}

async fn by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<CommunityResponse>> {
    let community = state.community_service.get_by_code(&code).await?;
    Ok(Json(community.into()))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CommunityResponse>> {
    let community = state.community_service.get_by_id(&id).await?;
    Ok(Json(community.into()))
}

async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateCommunityInput>,
) -> AppResult<Json<CommunityResponse>> {
    let community = state.community_service.create(req).await?;
    Ok(Json(community.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/search", get(search))
        .route("/code/{code}", get(by_code))
        .route("/{id}", get(show))
}
