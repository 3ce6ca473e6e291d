//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod discussion;
pub mod identity;
pub mod reputation;
pub mod scoring;
pub mod user;
pub mod view_ledger;
pub mod vote_ledger;

pub use comment::{CommentService, CreateCommentInput};
pub use discussion::{
    CreateDiscussionInput, DiscussionPage, DiscussionService, DiscussionWithTally,
    TrendingPeriod,
};
pub use identity::IdentityResolver;
pub use reputation::{Level, ReputationService, Standing};
pub use scoring::{ScoringEngine, Tally, VoteOutcome};
pub use user::{ProviderProfile, UserService};
pub use view_ledger::ViewLedger;
pub use vote_ledger::VoteLedger;
