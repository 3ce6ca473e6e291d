//! Discussion entity (a topic users vote agree/disagree on).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discussion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Author user ID (NULL for anonymous posts)
    #[sea_orm(indexed, nullable)]
    pub user_id: Option<String>,

    /// Author session token for anonymous posts
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub session_id: Option<String>,

    /// Weighted agree tally
    #[sea_orm(default_value = 0)]
    pub agree_count: i64,

    /// Weighted disagree tally
    #[sea_orm(default_value = 0)]
    pub disagree_count: i64,

    #[sea_orm(default_value = 0)]
    pub view_count: i64,

    /// Comments count (denormalized)
    #[sea_orm(default_value = 0)]
    pub comment_count: i64,

    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
