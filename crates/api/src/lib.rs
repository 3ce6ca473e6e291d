//! HTTP API layer for saythat.
//!
//! - **Endpoints**: sign-in, votes, views, reputation, discussions and comments
//! - **Extractors**: authenticated users and the acting [`extractors::Voter`]
//! - **Middleware**: bearer authentication and the anonymous session guard
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware, session_middleware};
