//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use saythat_common::{AppError, VoterKey};
use saythat_db::entities::user;

use crate::middleware::AppState;

/// Authenticated user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Anonymous session token of the request, set by the session middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

/// The identity acting on this request: the signed-in user if any,
/// otherwise the browser session.
#[derive(Debug, Clone)]
pub struct Voter(pub VoterKey);

impl FromRequestParts<AppState> for Voter {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts.extensions.get::<user::Model>().map(|u| u.id.as_str());
        let session = parts.extensions.get::<SessionToken>().map(|s| s.0.as_str());

        state.identity.resolve(user_id, session).map(Voter)
    }
}
