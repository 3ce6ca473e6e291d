//! API integration tests.
//!
//! These tests drive the full router, middleware included, against a mock
//! database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware,
    response::Response,
};
use chrono::Utc;
use saythat_api::{AppState, auth_middleware, router as api_router, session_middleware};
use saythat_common::config::{ListingConfig, PointsConfig, SessionConfig};
use saythat_core::{
    CommentService, DiscussionService, IdentityResolver, ReputationService, ScoringEngine,
    UserService, ViewLedger, VoteLedger,
};
use saythat_db::{
    entities::{discussion, reputation, user, vote_record},
    repositories::{
        CommentRepository, DiscussionRepository, ReputationRepository, UserRepository,
        ViewRecordRepository, VoteRecordRepository,
    },
};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create test app state on top of the given mock database.
fn create_test_state(db: MockDatabase) -> AppState {
    let db = Arc::new(db.into_connection());
    let points = PointsConfig::default();
    let listing = ListingConfig::default();

    let user_repo = UserRepository::new(Arc::clone(&db));
    let reputation_repo = ReputationRepository::new(Arc::clone(&db));
    let discussion_repo = DiscussionRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let vote_repo = VoteRecordRepository::new(Arc::clone(&db));

    AppState {
        identity: IdentityResolver::new(),
        user_service: UserService::new(user_repo, reputation_repo.clone()),
        reputation_service: ReputationService::new(Arc::clone(&db), reputation_repo),
        scoring_engine: ScoringEngine::new(
            Arc::clone(&db),
            VoteLedger::new(vote_repo),
            points.clone(),
        ),
        view_ledger: ViewLedger::new(Arc::clone(&db), ViewRecordRepository::new()),
        discussion_service: DiscussionService::new(
            Arc::clone(&db),
            discussion_repo.clone(),
            points.clone(),
            listing.clone(),
        ),
        comment_service: CommentService::new(
            Arc::clone(&db),
            comment_repo,
            discussion_repo,
            points,
            listing,
        ),
        session: SessionConfig::default(),
    }
}

/// Create the router exactly as the server mounts it.
fn create_test_router(db: MockDatabase) -> Router {
    let state = create_test_state(db);

    Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
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

fn create_test_discussion(id: &str, session_id: &str, agree: i64) -> discussion::Model {
    discussion::Model {
        id: id.to_string(),
        subject: "Tabs or spaces".to_string(),
        content: String::new(),
        user_id: None,
        session_id: Some(session_id.to_string()),
        agree_count: agree,
        disagree_count: 0,
        view_count: 0,
        comment_count: 0,
        created_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json("/api/nonexistent", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_browser_gets_session_cookie() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json("/api/discussions/trending", r#"{"period":"yearly"}"#))
        .await
        .unwrap();

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();

    assert!(cookie.starts_with("saythat_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_existing_session_cookie_is_kept() {
    let app = create_test_router(empty_db());

    let request = Request::builder()
        .uri("/api/discussions/trending")
        .method("POST")
        .header("Content-Type", "application/json")
        .header(header::COOKIE, "saythat_session=existing-token")
        .body(Body::from(r#"{"period":"yearly"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_invalid_trending_period() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json("/api/discussions/trending", r#"{"period":"yearly"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_cast_unknown_vote_type() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json(
            "/api/votes/cast",
            r#"{"targetKind":"discussion","targetId":"d1","voteType":"meh"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "INVALID_VOTE_TYPE");
}

#[tokio::test]
async fn test_cast_vote_type_of_other_axis() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json(
            "/api/votes/cast",
            r#"{"targetKind":"discussion","targetId":"d1","voteType":"up"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cast_anonymous_agree() {
    let vote = vote_record::Model {
        id: "v1".to_string(),
        voter_key: "session:voter".to_string(),
        user_id: None,
        target_kind: vote_record::TargetKind::Discussion,
        target_id: "d1".to_string(),
        vote_type: vote_record::VoteType::Agree,
        weight: 1,
        created_at: Utc::now().into(),
    };
    let db = empty_db()
        .append_query_results([[create_test_discussion("d1", "author", 0)]])
        .append_query_results([[maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(0))
        }]])
        .append_query_results([[vote]])
        .append_query_results([[create_test_discussion("d1", "author", 1)]]);
    let app = create_test_router(db);

    let request = Request::builder()
        .uri("/api/votes/cast")
        .method("POST")
        .header("Content-Type", "application/json")
        .header(header::COOKIE, "saythat_session=voter")
        .body(Body::from(
            r#"{"targetKind":"discussion","targetId":"d1","voteType":"chan"}"#,
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["success"], true);
    assert_eq!(body["data"]["agreePercent"], 100);
    assert_eq!(body["data"]["disagreePercent"], 0);
    assert_eq!(body["data"]["totalVotes"], 1);
    assert_eq!(body["data"]["weight"], 1);
}

#[tokio::test]
async fn test_cast_on_own_discussion_is_forbidden() {
    let db = empty_db().append_query_results([[create_test_discussion("d1", "me", 0)]]);
    let app = create_test_router(db);

    let request = Request::builder()
        .uri("/api/votes/cast")
        .method("POST")
        .header("Content-Type", "application/json")
        .header(header::COOKIE, "saythat_session=me")
        .body(Body::from(
            r#"{"targetKind":"discussion","targetId":"d1","voteType":"agree"}"#,
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "SELF_VOTE_FORBIDDEN");
}

#[tokio::test]
async fn test_show_missing_discussion() {
    let db = empty_db().append_query_results([Vec::<discussion::Model>::new()]);
    let app = create_test_router(db);

    let response = app
        .oneshot(post_json(
            "/api/discussions/show",
            r#"{"discussionId":"missing"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "DISCUSSION_NOT_FOUND");
}

#[tokio::test]
async fn test_show_discussion_without_votes_is_even() {
    let db = empty_db().append_query_results([[create_test_discussion("d1", "author", 0)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(post_json("/api/discussions/show", r#"{"discussionId":"d1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["agreePercent"], 50);
    assert_eq!(body["data"]["disagreePercent"], 50);
}

#[tokio::test]
async fn test_reputation_show() {
    let record = reputation::Model {
        user_id: "u1".to_string(),
        points: 150_000,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    };
    let app = create_test_router(empty_db().append_query_results([[record]]));

    let response = app
        .oneshot(post_json("/api/reputation/show", r#"{"userId":"u1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["points"], 150_000);
    assert_eq!(body["data"]["level"], "silver");
    assert_eq!(body["data"]["votingPower"], 4);
    assert_eq!(body["data"]["icon"], "🥈");
}

#[tokio::test]
async fn test_reputation_show_requires_user() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json("/api/reputation/show", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_i_requires_auth() {
    let app = create_test_router(empty_db());

    let response = app.oneshot(post_json("/api/i", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

fn create_test_user(token: Option<&str>) -> user::Model {
    user::Model {
        id: "u1".to_string(),
        nick: "kakao user".to_string(),
        email: "demo@kakao.com".to_string(),
        provider: "kakao".to_string(),
        provider_id: "kakao_demo_456".to_string(),
        token: token.map(ToString::to_string),
        created_at: Utc::now().into(),
    }
}

fn create_test_reputation(points: i64) -> reputation::Model {
    reputation::Model {
        user_id: "u1".to_string(),
        points,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[tokio::test]
async fn test_signin_returns_token_and_standing() {
    let db = empty_db()
        .append_query_results([[create_test_user(Some("tok-1"))]])
        .append_query_results([[create_test_reputation(12_000)]])
        .append_query_results([[create_test_reputation(12_000)]]);
    let app = create_test_router(db);

    let response = app
        .oneshot(post_json(
            "/api/auth/signin",
            r#"{"provider":"kakao","providerId":"kakao_demo_456","email":"demo@kakao.com","nick":"kakao user"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["token"], "tok-1");
    assert_eq!(body["data"]["user"]["id"], "u1");
    assert_eq!(body["data"]["user"]["level"], "bronze");
}

#[tokio::test]
async fn test_signin_rejects_invalid_profile() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json(
            "/api/auth/signin",
            r#"{"provider":"kakao","providerId":"k1","email":"nope","nick":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signout_revokes_token() {
    let db = empty_db()
        .append_query_results([[create_test_user(Some("tok-1"))]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }]);
    let app = create_test_router(db);

    let request = Request::builder()
        .uri("/api/auth/signout")
        .method("POST")
        .header("Content-Type", "application/json")
        .header(header::AUTHORIZATION, "Bearer tok-1")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["ok"], true);
}

#[tokio::test]
async fn test_signout_requires_auth() {
    let app = create_test_router(empty_db());

    let response = app
        .oneshot(post_json("/api/auth/signout", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
