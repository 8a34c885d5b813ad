//! API endpoints.

#![allow(missing_docs)]

mod auth;
mod comments;
mod communities;
mod health;
mod posts;
mod reports;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/auth", auth::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/communities", communities::router())
        .nest("/reports", reports::router())
        .nest("/users", users::router())
}
