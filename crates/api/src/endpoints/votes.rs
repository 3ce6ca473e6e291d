//! Voting endpoints.

use axum::{Json, Router, extract::State, routing::post};
use saythat_common::AppResult;
use saythat_core::VoteOutcome;
use saythat_db::entities::vote_record::{TargetKind, VoteType};
use serde::{Deserialize, Serialize};

use crate::{extractors::Voter, middleware::AppState, response::ApiResponse};

/// Cast vote request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub target_kind: String,
    pub target_id: String,
    /// `agree`/`disagree` on discussions, `up`/`down` on comments.
    pub vote_type: String,
}

/// Tally after an accepted vote.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteResponse {
    pub success: bool,
    pub agree_percent: i64,
    pub disagree_percent: i64,
    pub total_votes: i64,
    pub weight: i64,
}

impl From<VoteOutcome> for CastVoteResponse {
    fn from(o: VoteOutcome) -> Self {
        Self {
            success: o.success,
            agree_percent: o.agree_percent,
            disagree_percent: o.disagree_percent,
            total_votes: o.total_votes,
            weight: o.weight,
        }
    }
}

/// Cast a weighted vote on a discussion or comment.
async fn cast(
    Voter(voter): Voter,
    State(state): State<AppState>,
    Json(req): Json<CastVoteRequest>,
) -> AppResult<ApiResponse<CastVoteResponse>> {
    let target_kind: TargetKind = req.target_kind.parse()?;
    let vote_type: VoteType = req.vote_type.parse()?;

    let outcome = state
        .scoring_engine
        .cast_vote(&voter, target_kind, &req.target_id, vote_type)
        .await?;

    Ok(ApiResponse::ok(outcome.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/cast", post(cast))
}
