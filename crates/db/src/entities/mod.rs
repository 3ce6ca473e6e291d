//! Database entities.

#![allow(missing_docs)]

pub mod comment;
pub mod discussion;
pub mod reputation;
pub mod user;
pub mod view_record;
pub mod vote_record;

pub use comment::Entity as Comment;
pub use discussion::Entity as Discussion;
pub use reputation::Entity as Reputation;
pub use user::Entity as User;
pub use view_record::Entity as ViewRecord;
pub use vote_record::Entity as VoteRecord;
