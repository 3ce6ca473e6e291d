//! Reputation endpoints.

use axum::{Json, Router, extract::State, routing::post};
use saythat_common::{AppError, AppResult};
use saythat_core::{Level, Standing};
use serde::{Deserialize, Serialize};

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Show reputation request. Without `userId`, shows the signed-in user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowReputationRequest {
    pub user_id: Option<String>,
}

/// Reputation response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationResponse {
    pub user_id: String,
    pub points: i64,
    pub level: Level,
    pub voting_power: i64,
    pub icon: &'static str,
}

impl From<Standing> for ReputationResponse {
    fn from(s: Standing) -> Self {
        Self {
            user_id: s.user_id,
            points: s.points,
            level: s.level,
            voting_power: s.voting_power,
            icon: s.icon,
        }
    }
}

/// Show a user's points, level and voting power.
async fn show(
    MaybeAuthUser(me): MaybeAuthUser,
    State(state): State<AppState>,
    Json(req): Json<ShowReputationRequest>,
) -> AppResult<ApiResponse<ReputationResponse>> {
    let user_id = req
        .user_id
        .or_else(|| me.map(|u| u.id))
        .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))?;

    let standing = state.reputation_service.standing(&user_id).await?;
    Ok(ApiResponse::ok(standing.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/show", post(show))
}
