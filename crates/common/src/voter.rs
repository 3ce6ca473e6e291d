//! Normalized voter identity.

use std::fmt;

use crate::error::{AppError, AppResult};

const USER_PREFIX: &str = "user:";
const SESSION_PREFIX: &str = "session:";

/// The identity a vote or view is attributed to.
///
/// Authenticated and anonymous identities never merge: a user who votes
/// anonymously and then logs in is a different voter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VoterKey {
    /// A durable user id.
    Authenticated(String),
    /// A per-browser-session token.
    Anonymous(String),
}

impl VoterKey {
    /// The user id, if this voter is authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated(id) => Some(id),
            Self::Anonymous(_) => None,
        }
    }

    /// The session token, if this voter is anonymous.
    #[must_use]
    pub fn session_token(&self) -> Option<&str> {
        match self {
            Self::Authenticated(_) => None,
            Self::Anonymous(token) => Some(token),
        }
    }

    /// The single-column form stored in ledger tables.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            Self::Authenticated(id) => format!("{USER_PREFIX}{id}"),
            Self::Anonymous(token) => format!("{SESSION_PREFIX}{token}"),
        }
    }

    /// Parse the stored form back.
    pub fn from_storage_key(key: &str) -> AppResult<Self> {
        if let Some(id) = key.strip_prefix(USER_PREFIX) {
            return Ok(Self::Authenticated(id.to_string()));
        }
        if let Some(token) = key.strip_prefix(SESSION_PREFIX) {
            return Ok(Self::Anonymous(token.to_string()));
        }
        Err(AppError::Internal(format!("Malformed voter key: {key}")))
    }

    /// Build the author identity of a piece of content.
    ///
    /// Content posted by a user is attributed to the user even if a session
    /// token was also recorded.
    #[must_use]
    pub fn author(user_id: Option<&str>, session_token: Option<&str>) -> Option<Self> {
        user_id
            .map(|id| Self::Authenticated(id.to_string()))
            .or_else(|| session_token.map(|t| Self::Anonymous(t.to_string())))
    }
}

impl fmt::Display for VoterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Session tokens are bearer secrets; keep them out of logs.
        match self {
            Self::Authenticated(id) => write!(f, "{USER_PREFIX}{id}"),
            Self::Anonymous(_) => write!(f, "{SESSION_PREFIX}<redacted>"),
        }
    }
}
