//! Comment endpoints.

use axum::{Json, Router, extract::State, routing::post};
use saythat_common::AppResult;
use saythat_core::CreateCommentInput;
use saythat_db::entities::comment::{self, Stance};
use serde::{Deserialize, Serialize};

use crate::{extractors::Voter, middleware::AppState, response::ApiResponse};

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub created_at: String,
    pub discussion_id: String,
    pub user_id: Option<String>,
    pub content: String,
    pub stance: Stance,
    pub upvote_count: i64,
    pub downvote_count: i64,
}

impl From<comment::Model> for CommentResponse {
    fn from(c: comment::Model) -> Self {
        Self {
            id: c.id,
            created_at: c.created_at.to_rfc3339(),
            discussion_id: c.discussion_id,
            user_id: c.user_id,
            content: c.content,
            stance: c.stance,
            upvote_count: c.upvote_count,
            downvote_count: c.downvote_count,
        }
    }
}

/// Post a comment.
async fn create(
    Voter(author): Voter,
    State(state): State<AppState>,
    Json(req): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let created = state.comment_service.create(&author, req).await?;
    Ok(ApiResponse::ok(created.into()))
}

/// Comments-of-a-discussion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionCommentsRequest {
    pub discussion_id: String,
}

/// All comments on a discussion, oldest first.
async fn list(
    State(state): State<AppState>,
    Json(req): Json<DiscussionCommentsRequest>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.list(&req.discussion_id).await?;
    Ok(ApiResponse::ok(comments.into_iter().map(Into::into).collect()))
}

/// Most up-voted comments on a discussion.
async fn best(
    State(state): State<AppState>,
    Json(req): Json<DiscussionCommentsRequest>,
) -> AppResult<ApiResponse<Vec<CommentResponse>>> {
    let comments = state.comment_service.best(&req.discussion_id).await?;
    Ok(ApiResponse::ok(comments.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create))
        .route("/list", post(list))
        .route("/best", post(best))
}
