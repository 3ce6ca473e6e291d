//! Scoring engine: applies weighted votes and rewards authors.

use std::sync::Arc;

use saythat_common::{AppError, AppResult, VoterKey, config::PointsConfig};
use saythat_db::{
    entities::vote_record::{TargetKind, VoteType},
    repositories::{CommentRepository, DiscussionRepository},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;

use crate::services::{reputation::ReputationService, vote_ledger::VoteLedger};

/// Weighted counters of a target: agree/disagree for discussions,
/// up/down for comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub positive: i64,
    pub negative: i64,
}

impl Tally {
    #[must_use]
    pub const fn new(positive: i64, negative: i64) -> Self {
        Self { positive, negative }
    }

    #[must_use]
    pub const fn total(self) -> i64 {
        self.positive + self.negative
    }

    /// Split of the tally as whole percentages, positive side first.
    ///
    /// Rounds half up. An empty tally is 50/50, and the negative side is
    /// derived from the positive so the pair always sums to 100.
    #[must_use]
    pub const fn percentages(self) -> (i64, i64) {
        let total = self.total();
        if total <= 0 {
            return (50, 50);
        }
        let positive = (self.positive * 200 + total) / (2 * total);
        (positive, 100 - positive)
    }
}

/// Result of an accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub success: bool,
    pub target_kind: TargetKind,
    pub target_id: String,
    pub vote_type: VoteType,
    /// Amount the tally moved by: the voter's power at cast time.
    pub weight: i64,
    pub agree_percent: i64,
    pub disagree_percent: i64,
    pub total_votes: i64,
}

impl VoteOutcome {
    fn new(target_id: &str, vote_type: VoteType, weight: i64, tally: Tally) -> Self {
        let (agree_percent, disagree_percent) = tally.percentages();
        Self {
            success: true,
            target_kind: vote_type.target_kind(),
            target_id: target_id.to_string(),
            vote_type,
            weight,
            agree_percent,
            disagree_percent,
            total_votes: tally.total(),
        }
    }
}

/// The author of a vote target.
struct Authorship {
    author: Option<VoterKey>,
    user_id: Option<String>,
}

/// Scoring engine.
#[derive(Clone)]
pub struct ScoringEngine {
    db: Arc<DatabaseConnection>,
    vote_ledger: VoteLedger,
    points: PointsConfig,
}

impl ScoringEngine {
    /// Create a new scoring engine.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        vote_ledger: VoteLedger,
        points: PointsConfig,
    ) -> Self {
        Self {
            db,
            vote_ledger,
            points,
        }
    }

    /// Cast a vote.
    ///
    /// The vote record, the tally increment and the author's award are
    /// written in one transaction; any failure leaves none of them behind.
    pub async fn cast_vote(
        &self,
        voter: &VoterKey,
        target_kind: TargetKind,
        target_id: &str,
        vote_type: VoteType,
    ) -> AppResult<VoteOutcome> {
        if vote_type.target_kind() != target_kind {
            return Err(AppError::InvalidVoteType(format!(
                "{vote_type:?} cannot be cast on a {target_kind:?}"
            )));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let authorship = Self::authorship_on(&txn, target_kind, target_id).await?;
        if authorship.author.as_ref() == Some(voter) {
            tracing::debug!(voter = %voter, target_id, "Self-vote rejected");
            return Err(AppError::SelfVoteForbidden);
        }

        let weight = ReputationService::voting_power_on(&txn, voter).await?;

        self.vote_ledger
            .record_vote(&txn, voter, target_kind, target_id, vote_type, weight)
            .await?;

        let tally = match target_kind {
            TargetKind::Discussion => {
                let d = DiscussionRepository::add_to_tally_on(
                    &txn,
                    target_id,
                    vote_type.is_positive(),
                    weight,
                )
                .await?;
                Tally::new(d.agree_count, d.disagree_count)
            }
            TargetKind::Comment => {
                let c = CommentRepository::add_to_tally_on(
                    &txn,
                    target_id,
                    vote_type.is_positive(),
                    weight,
                )
                .await?;
                Tally::new(c.upvote_count, c.downvote_count)
            }
        };

        let (award, reason) = self.author_award(vote_type);
        ReputationService::award_on(&txn, authorship.user_id.as_deref(), award, reason).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            voter = %voter,
            target_id,
            vote_type = ?vote_type,
            weight,
            "Vote cast"
        );

        Ok(VoteOutcome::new(target_id, vote_type, weight, tally))
    }

    /// Points an author receives for a vote on their content.
    const fn author_award(&self, vote_type: VoteType) -> (i64, &'static str) {
        match vote_type {
            VoteType::Up => (self.points.comment_upvote, "comment_upvote"),
            VoteType::Agree | VoteType::Disagree | VoteType::Down => {
                (self.points.vote_received, "vote_received")
            }
        }
    }

    async fn authorship_on<C: ConnectionTrait>(
        conn: &C,
        target_kind: TargetKind,
        target_id: &str,
    ) -> AppResult<Authorship> {
        let (user_id, session_id) = match target_kind {
            TargetKind::Discussion => {
                let d = DiscussionRepository::find_by_id_on(conn, target_id)
                    .await?
                    .ok_or_else(|| AppError::DiscussionNotFound(target_id.to_string()))?;
                (d.user_id, d.session_id)
            }
            TargetKind::Comment => {
                let c = CommentRepository::find_by_id_on(conn, target_id)
                    .await?
                    .ok_or_else(|| AppError::CommentNotFound(target_id.to_string()))?;
                (c.user_id, c.session_id)
            }
        };

        Ok(Authorship {
            author: VoterKey::author(user_id.as_deref(), session_id.as_deref()),
            user_id,
        })
    }
}
