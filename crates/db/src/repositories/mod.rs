//! Repository layer.

mod comment;
mod discussion;
mod reputation;
mod user;
mod view_record;
mod vote_record;

pub use comment::CommentRepository;
pub use discussion::DiscussionRepository;
pub use reputation::ReputationRepository;
pub use user::UserRepository;
pub use view_record::ViewRecordRepository;
pub use vote_record::VoteRecordRepository;
