//! Voter identity resolution.

use saythat_common::{AppError, AppResult, IdGenerator, VoterKey};

/// Normalizes the identities a request may carry into a single [`VoterKey`].
#[derive(Clone, Default)]
pub struct IdentityResolver {
    id_gen: IdGenerator,
}

impl IdentityResolver {
    /// Create a new identity resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve the acting identity.
    ///
    /// An authenticated user always wins over the session token. Without
    /// either, the request has no session mechanism and cannot vote.
    pub fn resolve(
        &self,
        user_id: Option<&str>,
        session_token: Option<&str>,
    ) -> AppResult<VoterKey> {
        if let Some(id) = user_id.filter(|id| !id.is_empty()) {
            return Ok(VoterKey::Authenticated(id.to_string()));
        }

        session_token
            .filter(|token| !token.is_empty())
            .map(|token| VoterKey::Anonymous(token.to_string()))
            .ok_or(AppError::IdentityUnresolved)
    }

    /// Mint a token for a browser session that has none yet.
    #[must_use]
    pub fn mint_session_token(&self) -> String {
        self.id_gen.generate_session_token()
    }
}
