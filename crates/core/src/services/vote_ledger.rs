//! Vote ledger: one vote per voter and target, whatever the direction.

use chrono::Utc;
use saythat_common::{AppError, AppResult, IdGenerator, VoterKey};
use saythat_db::{
    entities::vote_record::{self, TargetKind, VoteType},
    repositories::VoteRecordRepository,
};
use sea_orm::{ConnectionTrait, Set};

/// Vote ledger service.
#[derive(Clone)]
pub struct VoteLedger {
    vote_repo: VoteRecordRepository,
    id_gen: IdGenerator,
}

impl VoteLedger {
    /// Create a new vote ledger.
    #[must_use]
    pub const fn new(vote_repo: VoteRecordRepository) -> Self {
        Self {
            vote_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Whether `voter` already voted on the target.
    pub async fn has_voted(
        &self,
        voter: &VoterKey,
        target_kind: TargetKind,
        target_id: &str,
    ) -> AppResult<bool> {
        self.vote_repo.has_voted(voter, target_kind, target_id).await
    }

    /// Whether `voter` already voted on the target, on the given transaction.
    async fn has_voted_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        voter: &VoterKey,
        target_kind: TargetKind,
        target_id: &str,
    ) -> AppResult<bool> {
        VoteRecordRepository::has_voted_on(conn, voter, target_kind, target_id).await
    }

    /// Record a vote on the given transaction, rejecting a voter who already
    /// voted on the target in either direction.
    pub async fn record_vote<C: ConnectionTrait>(
        &self,
        conn: &C,
        voter: &VoterKey,
        target_kind: TargetKind,
        target_id: &str,
        vote_type: VoteType,
        weight: i64,
    ) -> AppResult<vote_record::Model> {
        if vote_type.target_kind() != target_kind {
            return Err(AppError::InvalidVoteType(format!(
                "{vote_type:?} cannot be cast on a {target_kind:?}"
            )));
        }

        if self.has_voted_on(conn, voter, target_kind, target_id).await? {
            return Err(AppError::DuplicateVote);
        }

        self.insert_on(conn, voter, target_id, vote_type, weight)
            .await
    }

    /// Insert a vote record without the existence check.
    ///
    /// The unique index on (voter, target) has the final word: an insert
    /// that races another vote from the same voter fails with
    /// [`AppError::DuplicateVote`].
    async fn insert_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        voter: &VoterKey,
        target_id: &str,
        vote_type: VoteType,
        weight: i64,
    ) -> AppResult<vote_record::Model> {
        let model = vote_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            voter_key: Set(voter.storage_key()),
            user_id: Set(voter.user_id().map(ToString::to_string)),
            target_kind: Set(vote_type.target_kind()),
            target_id: Set(target_id.to_string()),
            vote_type: Set(vote_type),
            weight: Set(weight),
            created_at: Set(Utc::now().into()),
        };

        VoteRecordRepository::create_on(conn, model)
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::DuplicateVote) {
                    tracing::debug!(voter = %voter, target_id, "Concurrent duplicate vote rejected");
                }
            })
    }
}
