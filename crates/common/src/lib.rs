//! Common utilities and shared types for saythat.
//!
//! This crate provides foundational components used across all saythat crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers and session tokens via [`IdGenerator`]
//! - **Voter identity**: The normalized [`VoterKey`] used for vote and view dedup
//!
//! # Example
//!
//! ```no_run
//! use saythat_common::{AppResult, Config, IdGenerator, VoterKey};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let voter = VoterKey::Anonymous(id_gen.generate_session_token());
//!     println!("{} votes as {}", config.server.url, voter);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod voter;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use voter::VoterKey;
