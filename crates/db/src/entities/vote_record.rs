//! Vote record entity: the permanent dedup ledger for votes.

use std::str::FromStr;

use saythat_common::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of content a vote targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    #[sea_orm(string_value = "discussion")]
    Discussion,
    #[sea_orm(string_value = "comment")]
    Comment,
}

/// Vote direction.
///
/// Discussions are voted on the agree/disagree axis, comments on the
/// up/down axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    #[sea_orm(string_value = "agree")]
    Agree,
    #[sea_orm(string_value = "disagree")]
    Disagree,
    #[sea_orm(string_value = "up")]
    Up,
    #[sea_orm(string_value = "down")]
    Down,
}

impl VoteType {
    /// The target kind this vote type applies to.
    #[must_use]
    pub const fn target_kind(self) -> TargetKind {
        match self {
            Self::Agree | Self::Disagree => TargetKind::Discussion,
            Self::Up | Self::Down => TargetKind::Comment,
        }
    }

    /// Agree and up are the positive side of their axis.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Agree | Self::Up)
    }
}

impl FromStr for VoteType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agree" | "chan" => Ok(Self::Agree),
            "disagree" | "ban" => Ok(Self::Disagree),
            "up" | "plus" => Ok(Self::Up),
            "down" | "minus" => Ok(Self::Down),
            _ => Err(AppError::InvalidVoteType(s.to_string())),
        }
    }
}

impl FromStr for TargetKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discussion" => Ok(Self::Discussion),
            "comment" => Ok(Self::Comment),
            _ => Err(AppError::BadRequest(format!("Unknown target kind: {s}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// `VoterKey::storage_key()` of the voter
    pub voter_key: String,

    /// Set for authenticated voters only
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub target_kind: TargetKind,

    pub target_id: String,

    pub vote_type: VoteType,

    /// Voting power applied to the tally at cast time
    pub weight: i64,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
