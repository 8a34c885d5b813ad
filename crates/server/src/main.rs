//! Tangle server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use tangle_api::{AppState, auth_middleware, router as api_router};
use tangle_common::Config;
use tangle_core::{
    CommentService, CommunityService, PostService, ReportService, TokenService, UserService,
};
use tangle_db::repositories::{
    CommentRepository, CommunityRepository, PostRepository, ReportRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for SIGINT, or SIGTERM on Unix.
///
/// A handler that fails to install is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories into services.
fn build_state(db: Arc<sea_orm::DatabaseConnection>, config: &Config) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(&db));
    let community_repo = CommunityRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(db);

    let token_service = TokenService::new(config);
    let user_service = UserService::new(
        user_repo.clone(),
        community_repo.clone(),
        token_service.clone(),
        config.auth.demo_login,
    );
    let community_service = CommunityService::new(community_repo);
    let comment_service = CommentService::new(comment_repo, post_repo.clone(), user_repo.clone());
    let report_service = ReportService::new(report_repo, post_repo.clone(), user_repo.clone());
    let post_service = PostService::new(
        post_repo,
        user_repo,
        comment_service.clone(),
        report_service.clone(),
    );

    AppState {
        user_service,
        community_service,
        post_service,
        comment_service,
        report_service,
        token_service,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tangle=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting tangle server...");

    let config = Config::load()?;
    if config.auth.demo_login {
        warn!("Demo login is enabled: unknown identifiers are provisioned and passwords are not checked");
    }

    let db = tangle_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    tangle_db::migrate(&db).await?;
    info!("Migrations completed");

    let state = build_state(Arc::new(db), &config);

    let app = Router::new()
        .merge(api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
