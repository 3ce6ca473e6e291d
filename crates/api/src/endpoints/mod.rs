//! API endpoints.

mod auth;
mod comments;
mod discussions;
mod reputation;
mod users;
mod views;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .nest("/auth", auth::router())
        .nest("/votes", votes::router())
        .nest("/views", views::router())
        .nest("/reputation", reputation::router())
        .nest("/discussions", discussions::router())
        .nest("/comments", comments::router())
}
