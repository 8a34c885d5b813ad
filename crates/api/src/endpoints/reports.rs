//! Report endpoints.
//!
//! Anyone signed in can file and read reports; listing everything and
//! moving a report through its workflow is for administrators.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use serde::Deserialize;
use tangle_common::AppResult;
use tangle_core::CreateReportInput;

use crate::{
    extractors::{AdminUser, AuthUser},
    middleware::AppState,
    response::{self, ReportResponse},
};

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateReportInput>,
) -> AppResult<Json<ReportResponse>> {
    let report = state.report_service.create(&user.id, req).await?;
    Ok(Json(report.into()))
}

async fn list(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let reports = state.report_service.list_all().await?;
    Ok(Json(response::list(reports)))
}

async fn show(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ReportResponse>> {
    let report = state.report_service.get_by_id(&id).await?;
    Ok(Json(report.into()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub status: String,
    pub admin_notes: Option<String>,
}

async fn update_status(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<StatusQuery>,
) -> AppResult<Json<ReportResponse>> {
    let report = state
        .report_service
        .update_status(&id, &params.status, params.admin_notes)
        .await?;
    tracing::debug!(report_id = %report.id, admin_id = %admin.id, "Report moderated");
    Ok(Json(report.into()))
}

async fn by_user(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let reports = state.report_service.list_by_user(&user_id).await?;
    Ok(Json(response::list(reports)))
}

async fn by_post(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Json<Vec<ReportResponse>>> {
    let reports = state.report_service.list_by_post(&post_id).await?;
    Ok(Json(response::list(reports)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show))
        .route("/{id}/status", put(update_status))
        .route("/user/{user_id}", get(by_user))
        .route("/post/{post_id}", get(by_post))
}
