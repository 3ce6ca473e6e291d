//! Vote record repository.

use std::sync::Arc;

use crate::{
    entities::{
        VoteRecord,
        vote_record::{self, TargetKind},
    },
    is_unique_violation,
};
use saythat_common::{AppError, AppResult, VoterKey};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter,
};

/// Vote record repository for database operations.
#[derive(Clone)]
pub struct VoteRecordRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRecordRepository {
    /// Create a new vote record repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Whether `voter` has any vote on the target.
    pub async fn has_voted(
        &self,
        voter: &VoterKey,
        target_kind: TargetKind,
        target_id: &str,
    ) -> AppResult<bool> {
        Self::has_voted_on(self.db.as_ref(), voter, target_kind, target_id).await
    }

    /// Whether `voter` has any vote on the target, on the given connection or transaction.
    pub async fn has_voted_on<C: ConnectionTrait>(
        conn: &C,
        voter: &VoterKey,
        target_kind: TargetKind,
        target_id: &str,
    ) -> AppResult<bool> {
        let count = VoteRecord::find()
            .filter(vote_record::Column::VoterKey.eq(voter.storage_key()))
            .filter(vote_record::Column::TargetKind.eq(target_kind))
            .filter(vote_record::Column::TargetId.eq(target_id))
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Insert a vote record.
    ///
    /// A unique-constraint violation on (voter, target) surfaces as
    /// [`AppError::DuplicateVote`].
    pub async fn create_on<C: ConnectionTrait>(
        conn: &C,
        model: vote_record::ActiveModel,
    ) -> AppResult<vote_record::Model> {
        model.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::DuplicateVote
            } else {
                AppError::Database(e.to_string())
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, Set};
    use vote_record::VoteType;

    fn count_result(n: i64) -> std::collections::BTreeMap<&'static str, sea_orm::Value> {
        maplit::btreemap! {
            "num_items" => sea_orm::Value::BigInt(Some(n))
        }
    }

    #[tokio::test]
    async fn test_has_voted_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_result(0)]])
                .into_connection(),
        );

        let repo = VoteRecordRepository::new(db);
        let voter = VoterKey::Anonymous("sess".to_string());

        assert!(!repo.has_voted(&voter, TargetKind::Discussion, "d1").await.unwrap());
    }

    #[tokio::test]
    async fn test_has_voted_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[count_result(1)]])
                .into_connection(),
        );

        let repo = VoteRecordRepository::new(db);
        let voter = VoterKey::Authenticated("u1".to_string());

        assert!(repo.has_voted(&voter, TargetKind::Discussion, "d1").await.unwrap());
    }

    #[tokio::test]
    async fn test_create() {
        let record = vote_record::Model {
            id: "v1".to_string(),
            voter_key: "user:u1".to_string(),
            user_id: Some("u1".to_string()),
            target_kind: TargetKind::Discussion,
            target_id: "d1".to_string(),
            vote_type: VoteType::Agree,
            weight: 2,
            created_at: Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[record.clone()]])
            .into_connection();

        let model = vote_record::ActiveModel {
            id: Set(record.id.clone()),
            voter_key: Set(record.voter_key.clone()),
            user_id: Set(record.user_id.clone()),
            target_kind: Set(record.target_kind),
            target_id: Set(record.target_id.clone()),
            vote_type: Set(record.vote_type),
            weight: Set(record.weight),
            created_at: Set(record.created_at),
        };

        let created = VoteRecordRepository::create_on(&db, model).await.unwrap();
        assert_eq!(created.weight, 2);
    }
}
