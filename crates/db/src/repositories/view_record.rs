//! View record repository.

use crate::{
    entities::{ViewRecord, view_record},
    is_unique_violation,
};
use chrono::{NaiveDate, Utc};
use saythat_common::{AppError, AppResult, IdGenerator, VoterKey};
use sea_orm::{ConnectionTrait, EntityTrait, Set, sea_query::OnConflict};

/// View record repository.
///
/// Only exposes transactional operations; the counted view and the
/// discussion's view counter are always written together.
#[derive(Clone, Default)]
pub struct ViewRecordRepository {
    id_gen: IdGenerator,
}

impl ViewRecordRepository {
    /// Create a new view record repository.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            id_gen: IdGenerator::new(),
        }
    }

    /// Record a view unless one already exists for this viewer, discussion and day.
    ///
    /// Returns `true` if a new record was written.
    pub async fn insert_if_absent_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        viewer: &VoterKey,
        discussion_id: &str,
        day: NaiveDate,
    ) -> AppResult<bool> {
        let model = view_record::ActiveModel {
            id: Set(self.id_gen.generate()),
            voter_key: Set(viewer.storage_key()),
            discussion_id: Set(discussion_id.to_string()),
            view_date: Set(day),
            created_at: Set(Utc::now().into()),
        };

        let result = ViewRecord::insert(model)
            .on_conflict(
                OnConflict::columns([
                    view_record::Column::VoterKey,
                    view_record::Column::DiscussionId,
                    view_record::Column::ViewDate,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(conn)
            .await;

        match result {
            Ok(rows) => Ok(rows > 0),
            Err(e) if is_unique_violation(&e) => Ok(false),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_first_view_is_counted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();

        let repo = ViewRecordRepository::new();
        let viewer = VoterKey::Anonymous("sess".to_string());
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert!(repo.insert_if_absent_on(&db, &viewer, "d1", day).await.unwrap());
    }

    #[tokio::test]
    async fn test_conflicting_view_is_not_counted() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();

        let repo = ViewRecordRepository::new();
        let viewer = VoterKey::Authenticated("u1".to_string());
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert!(!repo.insert_if_absent_on(&db, &viewer, "d1", day).await.unwrap());
    }
}
