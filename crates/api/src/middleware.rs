//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tangle_core::{
    CommentService, CommunityService, PostService, ReportService, TokenService, UserService,
};
use tracing::debug;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub community_service: CommunityService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub report_service: ReportService,
    pub token_service: TokenService,
}

/// Authentication middleware.
///
/// Verifies a `Bearer` token when present and stores its claims in the
/// request extensions. Requests without a valid token pass through
/// unauthenticated; extractors decide whether that is acceptable.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.token_service.decode(token.trim()) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(e) => debug!(error = %e, "Ignoring invalid bearer token"),
        }
    }

    next.run(req).await
}
