//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use saythat_common::config::SessionConfig;
use saythat_core::{
    CommentService, DiscussionService, IdentityResolver, ReputationService, ScoringEngine,
    UserService, ViewLedger,
};

use crate::extractors::SessionToken;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityResolver,
    pub user_service: UserService,
    pub reputation_service: ReputationService,
    pub scoring_engine: ScoringEngine,
    pub view_ledger: ViewLedger,
    pub discussion_service: DiscussionService,
    pub comment_service: CommentService,
    pub session: SessionConfig,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}

/// Session guard middleware.
///
/// Every request leaves with a session token in its extensions. A browser
/// without the cookie gets a freshly minted token, set on the response.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let existing = jar
        .get(&state.session.cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    if let Some(token) = existing {
        req.extensions_mut().insert(SessionToken(token));
        return next.run(req).await;
    }

    let token = state.identity.mint_session_token();
    req.extensions_mut().insert(SessionToken(token.clone()));
    tracing::debug!("Issued new session cookie");

    let response = next.run(req).await;
    (jar.add(session_cookie(&state.session, token)), response).into_response()
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .max_age(time::Duration::days(config.max_age_days))
        .build()
}
