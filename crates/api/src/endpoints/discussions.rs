//! Discussion endpoints.

use axum::{Json, Router, extract::State, routing::post};
use saythat_common::AppResult;
use saythat_core::{CreateDiscussionInput, DiscussionPage, DiscussionWithTally, TrendingPeriod};
use serde::{Deserialize, Serialize};

use crate::{extractors::Voter, middleware::AppState, response::ApiResponse};

/// Discussion response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionResponse {
    pub id: String,
    pub created_at: String,
    pub user_id: Option<String>,
    pub subject: String,
    pub content: String,
    pub agree_count: i64,
    pub disagree_count: i64,
    pub view_count: i64,
    pub comment_count: i64,
    pub agree_percent: i64,
    pub disagree_percent: i64,
    pub total_votes: i64,
}

impl From<DiscussionWithTally> for DiscussionResponse {
    fn from(d: DiscussionWithTally) -> Self {
        Self {
            id: d.discussion.id,
            created_at: d.discussion.created_at.to_rfc3339(),
            user_id: d.discussion.user_id,
            subject: d.discussion.subject,
            content: d.discussion.content,
            agree_count: d.discussion.agree_count,
            disagree_count: d.discussion.disagree_count,
            view_count: d.discussion.view_count,
            comment_count: d.discussion.comment_count,
            agree_percent: d.agree_percent,
            disagree_percent: d.disagree_percent,
            total_votes: d.total_votes,
        }
    }
}

/// Start a discussion.
async fn create(
    Voter(author): Voter,
    State(state): State<AppState>,
    Json(req): Json<CreateDiscussionInput>,
) -> AppResult<ApiResponse<DiscussionResponse>> {
    let created = state.discussion_service.create(&author, req).await?;
    Ok(ApiResponse::ok(DiscussionWithTally::from(created).into()))
}

/// Show discussion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDiscussionRequest {
    pub discussion_id: String,
}

/// Get a discussion with its current split.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowDiscussionRequest>,
) -> AppResult<ApiResponse<DiscussionResponse>> {
    let discussion = state.discussion_service.get(&req.discussion_id).await?;
    Ok(ApiResponse::ok(discussion.into()))
}

/// List discussions request.
#[derive(Debug, Deserialize)]
pub struct ListDiscussionsRequest {
    #[serde(default = "default_page")]
    pub page: u64,
}

const fn default_page() -> u64 {
    1
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionPageResponse {
    pub items: Vec<DiscussionResponse>,
    pub page: u64,
    pub has_next: bool,
}

impl From<DiscussionPage> for DiscussionPageResponse {
    fn from(p: DiscussionPage) -> Self {
        Self {
            items: p.items.into_iter().map(Into::into).collect(),
            page: p.page,
            has_next: p.has_next,
        }
    }
}

/// Newest discussions.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<ListDiscussionsRequest>,
) -> AppResult<ApiResponse<DiscussionPageResponse>> {
    let page = state.discussion_service.list(req.page).await?;
    Ok(ApiResponse::ok(page.into()))
}

/// Trending discussions request.
#[derive(Debug, Deserialize)]
pub struct TrendingRequest {
    /// `realtime`, `today`, `weekly` or `monthly`.
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "today".to_string()
}

/// Most voted discussions of a period.
async fn trending(
    State(state): State<AppState>,
    Json(req): Json<TrendingRequest>,
) -> AppResult<ApiResponse<Vec<DiscussionResponse>>> {
    let period: TrendingPeriod = req.period.parse()?;
    let discussions = state.discussion_service.trending(period).await?;

    Ok(ApiResponse::ok(
        discussions.into_iter().map(Into::into).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/show", post(show))
        .route("/list", post(list))
        .route("/trending", post(trending))
}
