//! API integration tests.
//!
//! These drive the full router, auth middleware included, against a mock
//! database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    response::Response,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::Value;
use std::{collections::BTreeMap, sync::Arc};
use tangle_api::{AppState, auth_middleware, router as api_router};
use tangle_core::{
    CommentService, CommunityService, PostService, ReportService, TokenService, UserService,
};
use tangle_db::{
    entities::{
        community, post,
        user::{self, UserRole},
    },
    repositories::{
        CommentRepository, CommunityRepository, PostRepository, ReportRepository, UserRepository,
    },
};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn count_row(n: i64) -> [BTreeMap<&'static str, sea_orm::Value>; 1] {
    [maplit::btreemap! {
        "num_items" => sea_orm::Value::BigInt(Some(n))
    }]
}

fn test_user(id: &str, role: UserRole) -> user::Model {
    user::Model {
        id: id.to_string(),
        full_name: "Priya Raman".to_string(),
        email: format!("{id}@example.com"),
        phone_number: "9876543210".to_string(),
        password_hash: String::new(),
        role,
        address: "12 Second Avenue".to_string(),
        locality: "Anna Nagar".to_string(),
        pincode: "600040".to_string(),
        is_active: true,
        is_verified: false,
        profile_picture: None,
        community_id: Some("c1".to_string()),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_community() -> community::Model {
    community::Model {
        id: "c1".to_string(),
        name: "Anna Nagar".to_string(),
        community_code: "ANNA001".to_string(),
        location: "Anna Nagar".to_string(),
        city: "Chennai".to_string(),
        state: "Tamil Nadu".to_string(),
        pincode: "600040".to_string(),
        is_active: true,
        created_at: Utc::now().into(),
    }
}

fn test_post(id: &str) -> post::Model {
    post::Model {
        id: id.to_string(),
        title: "Need a plumber".to_string(),
        description: "Kitchen sink is leaking".to_string(),
        category: post::PostCategory::HelpRequest,
        post_type: post::PostType::Request,
        contact_info: None,
        price: None,
        location: None,
        images: serde_json::json!([]),
        is_urgent: true,
        is_featured: false,
        view_count: 4,
        is_active: true,
        user_id: "u1".to_string(),
        community_id: "c1".to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

/// Build the application over one shared mock connection.
fn create_test_app(db: DatabaseConnection) -> (Router, TokenService) {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let community_repo = CommunityRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));

    let token_service = TokenService::with_secret(SECRET, 3600);
    let comment_service =
        CommentService::new(comment_repo, post_repo.clone(), user_repo.clone());
    let report_service = ReportService::new(report_repo, post_repo.clone(), user_repo.clone());

    let state = AppState {
        user_service: UserService::new(
            user_repo.clone(),
            community_repo.clone(),
            token_service.clone(),
            true,
        ),
        community_service: CommunityService::new(community_repo),
        post_service: PostService::new(
            post_repo,
            user_repo,
            comment_service.clone(),
            report_service.clone(),
        ),
        comment_service,
        report_service,
        token_service: token_service.clone(),
    };

    let app = api_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);
    (app, token_service)
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_user_count() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([count_row(3)])
        .into_connection();
    let (app, _) = create_test_app(db);

    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "UP");
    assert_eq!(body["database"], "CONNECTED");
    assert_eq!(body["userCount"], 3);
}

#[tokio::test]
async fn test_api_health_survives_database_failure() {
    let (app, _) = create_test_app(empty_db());

    let response = app.oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "UP");
    assert!(body["database"].as_str().unwrap().starts_with("ERROR"));
    assert!(body.get("userCount").is_none());
}

#[tokio::test]
async fn test_posts_require_authentication() {
    let (app, _) = create_test_app(empty_db());

    let response = app.oneshot(get("/posts", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(response).await;
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let (app, _) = create_test_app(empty_db());

    let response = app
        .oneshot(get("/users/profile", Some("not-a-jwt")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_existing_user_ignores_password_in_demo_mode() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", UserRole::Resident)]])
        .into_connection();
    let (app, tokens) = create_test_app(db);

    let response = app
        .oneshot(post_json(
            "/api/auth/login",
            r#"{"emailOrPhone":"u1@example.com","password":"wrong"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["tokenType"], "Bearer");
    assert_eq!(body["user"]["email"], "u1@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let claims = tokens.decode(body["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims.sub, "u1");
}

#[tokio::test]
async fn test_profile_includes_community_summary() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", UserRole::Resident)]])
        .append_query_results([[test_community()]])
        .into_connection();
    let (app, tokens) = create_test_app(db);
    let token = tokens.issue(&test_user("u1", UserRole::Resident)).unwrap();

    let response = app
        .oneshot(get("/api/auth/profile", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["id"], "u1");
    assert_eq!(body["role"], "RESIDENT");
    assert_eq!(body["community"]["name"], "Anna Nagar");
}

#[tokio::test]
async fn test_list_posts_with_all_category_is_unfiltered() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", UserRole::Resident)]])
        .append_query_results([count_row(1)])
        .append_query_results([[test_post("p1")]])
        .into_connection();
    let (app, tokens) = create_test_app(db);
    let token = tokens.issue(&test_user("u1", UserRole::Resident)).unwrap();

    let response = app
        .oneshot(get("/posts?category=ALL&page=0&size=10", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["size"], 10);
    assert_eq!(body["content"][0]["type"], "REQUEST");
    assert_eq!(body["content"][0]["category"], "HELP_REQUEST");
}

#[tokio::test]
async fn test_list_posts_rejects_unknown_category() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", UserRole::Resident)]])
        .into_connection();
    let (app, tokens) = create_test_app(db);
    let token = tokens.issue(&test_user("u1", UserRole::Resident)).unwrap();

    let response = app
        .oneshot(get("/posts?category=GOSSIP", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_posts_rejects_page_past_offset_range() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", UserRole::Resident)]])
        .into_connection();
    let (app, tokens) = create_test_app(db);
    let token = tokens.issue(&test_user("u1", UserRole::Resident)).unwrap();

    let response = app
        .oneshot(get("/posts?page=9223372036854775807", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_report_listing_requires_admin() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1", UserRole::Resident)]])
        .into_connection();
    let (app, tokens) = create_test_app(db);
    let token = tokens.issue(&test_user("u1", UserRole::Resident)).unwrap();

    let response = app.oneshot(get("/reports", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_unknown_community_code_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<community::Model>::new()])
        .into_connection();
    let (app, _) = create_test_app(db);

    let response = app
        .oneshot(get("/communities/code/NOPE999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let (app, _) = create_test_app(empty_db());

    let response = app
        .oneshot(get("/this/does/not/exist", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_with_invalid_json_returns_error() {
    let (app, _) = create_test_app(empty_db());

    let response = app
        .oneshot(post_json("/api/auth/login", "not valid json"))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}
