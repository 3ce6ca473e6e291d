//! Comment entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which side of the discussion a comment argues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    #[sea_orm(string_value = "agree")]
    Agree,
    #[sea_orm(string_value = "disagree")]
    Disagree,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub discussion_id: String,

    /// Author user ID (NULL for anonymous comments)
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// Author session token for anonymous comments
    #[sea_orm(nullable)]
    #[serde(skip_serializing)]
    pub session_id: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub stance: Stance,

    /// Weighted up-vote tally
    #[sea_orm(default_value = 0)]
    pub upvote_count: i64,

    /// Weighted down-vote tally
    #[sea_orm(default_value = 0)]
    pub downvote_count: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::discussion::Entity",
        from = "Column::DiscussionId",
        to = "super::discussion::Column::Id",
        on_delete = "Cascade"
    )]
    Discussion,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::discussion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discussion.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
