//! User endpoints.

use axum::{Json, Router, extract::State, routing::post};
use saythat_common::AppResult;
use saythat_core::{Level, Standing};
use saythat_db::entities::user;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// User response, including reputation standing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub created_at: String,
    pub nick: String,
    pub points: i64,
    pub level: Level,
    pub icon: &'static str,
}

impl UserResponse {
    pub(crate) fn new(user: user::Model, standing: Standing) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at.to_rfc3339(),
            nick: user.nick,
            points: standing.points,
            level: standing.level,
            icon: standing.icon,
        }
    }
}

/// Get the signed-in user.
async fn i(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserResponse>> {
    let standing = state.reputation_service.standing(&user.id).await?;

    Ok(ApiResponse::ok(UserResponse::new(user, standing)))
}

/// Show user request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowUserRequest {
    pub user_id: String,
}

/// Get a user by ID.
async fn show(
    State(state): State<AppState>,
    Json(req): Json<ShowUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&req.user_id).await?;
    let standing = state.reputation_service.standing(&user.id).await?;

    Ok(ApiResponse::ok(UserResponse::new(user, standing)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/i", post(i))
        .route("/users/show", post(show))
}
