//! saythat server entry point.

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use saythat_api::{AppState, auth_middleware, router as api_router, session_middleware};
use saythat_common::Config;
use saythat_core::{
    CommentService, DiscussionService, IdentityResolver, ReputationService, ScoringEngine,
    UserService, ViewLedger, VoteLedger,
};
use saythat_db::repositories::{
    CommentRepository, DiscussionRepository, ReputationRepository, UserRepository,
    ViewRecordRepository, VoteRecordRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Largest accepted request body. Discussions top out at 10k characters.
const MAX_BODY_BYTES: usize = 256 * 1024;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
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
            Ok(mut sig) => {
                sig.recv().await;
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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saythat=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting saythat server...");

    let config = Config::load()?;

    let db = Arc::new(saythat_db::init(&config).await?);
    info!("Connected to database");

    info!("Running database migrations...");
    saythat_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let reputation_repo = ReputationRepository::new(Arc::clone(&db));
    let discussion_repo = DiscussionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let vote_repo = VoteRecordRepository::new(Arc::clone(&db));
    let view_repo = ViewRecordRepository::new();

    // Initialize services
    let user_service = UserService::new(user_repo, reputation_repo.clone());
    let reputation_service = ReputationService::new(Arc::clone(&db), reputation_repo);
    let scoring_engine = ScoringEngine::new(
        Arc::clone(&db),
        VoteLedger::new(vote_repo),
        config.points.clone(),
    );
    let view_ledger = ViewLedger::new(Arc::clone(&db), view_repo);
    let discussion_service = DiscussionService::new(
        Arc::clone(&db),
        discussion_repo.clone(),
        config.points.clone(),
        config.listing.clone(),
    );
    let comment_service = CommentService::new(
        Arc::clone(&db),
        comment_repo,
        discussion_repo,
        config.points.clone(),
        config.listing.clone(),
    );

    let state = AppState {
        identity: IdentityResolver::new(),
        user_service,
        reputation_service,
        scoring_engine,
        view_ledger,
        discussion_service,
        comment_service,
        session: config.session.clone(),
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
