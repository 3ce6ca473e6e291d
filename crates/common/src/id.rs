//! ID generation utilities.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use ulid::Ulid;
use uuid::Uuid;

/// Number of random bytes behind an anonymous session token.
const SESSION_TOKEN_BYTES: usize = 32;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable, so ordering by ID is ordering
    /// by creation time.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an access token for an authenticated user.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // Use UUID v4 for tokens (no time component for security)
        Uuid::new_v4().simple().to_string()
    }

    /// Generate an anonymous session token.
    ///
    /// 32 bytes from the OS RNG, URL-safe base64 without padding (43 chars).
    #[must_use]
    pub fn generate_session_token(&self) -> String {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
