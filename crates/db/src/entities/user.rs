//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Display nickname
    #[sea_orm(unique)]
    pub nick: String,

    #[sea_orm(unique)]
    pub email: String,

    /// External login provider (e.g. "google", "kakao", "naver")
    pub provider: String,

    /// Account id at the provider
    pub provider_id: String,

    /// Access token
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::reputation::Entity")]
    Reputation,

    #[sea_orm(has_many = "super::discussion::Entity")]
    Discussion,

    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::reputation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reputation.def()
    }
}

impl Related<super::discussion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Discussion.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
