//! Authentication endpoints.
//!
//! The provider's OAuth exchange happens upstream; `signin` receives the
//! resulting profile and hands back a bearer token.

use axum::{Json, Router, extract::State, routing::post};
use saythat_common::AppResult;
use saythat_core::ProviderProfile;
use serde::Serialize;

use super::users::UserResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Sign in with a provider profile, registering on first login.
async fn signin(
    State(state): State<AppState>,
    Json(profile): Json<ProviderProfile>,
) -> AppResult<ApiResponse<SigninResponse>> {
    let mut user = state.user_service.find_or_create_by_provider(profile).await?;
    let standing = state.reputation_service.standing(&user.id).await?;
    let token = user.token.take().unwrap_or_default();

    Ok(ApiResponse::ok(SigninResponse {
        token,
        user: UserResponse::new(user, standing),
    }))
}

/// Signout response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignoutResponse {
    pub ok: bool,
}

/// Sign out, revoking the current token.
async fn signout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SignoutResponse>> {
    state.user_service.sign_out(&user.id).await?;

    Ok(ApiResponse::ok(SignoutResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(signin))
        .route("/signout", post(signout))
}
