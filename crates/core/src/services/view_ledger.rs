//! View ledger: at most one counted view per viewer, discussion and day.

use std::sync::Arc;

use chrono::NaiveDate;
use saythat_common::{AppError, AppResult, VoterKey};
use saythat_db::repositories::{DiscussionRepository, ViewRecordRepository};
use sea_orm::{DatabaseConnection, TransactionTrait};

/// View ledger service.
#[derive(Clone)]
pub struct ViewLedger {
    db: Arc<DatabaseConnection>,
    view_repo: ViewRecordRepository,
}

impl ViewLedger {
    /// Create a new view ledger.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, view_repo: ViewRecordRepository) -> Self {
        Self { db, view_repo }
    }

    /// Count a view if it is the viewer's first on this discussion today.
    ///
    /// Returns `false` for a repeat view, including one that loses a race
    /// against a concurrent first view.
    pub async fn record_view_if_first_today(
        &self,
        viewer: &VoterKey,
        discussion_id: &str,
        today: NaiveDate,
    ) -> AppResult<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if DiscussionRepository::find_by_id_on(&txn, discussion_id)
            .await?
            .is_none()
        {
            return Err(AppError::DiscussionNotFound(discussion_id.to_string()));
        }

        let counted = self
            .view_repo
            .insert_if_absent_on(&txn, viewer, discussion_id, today)
            .await?;

        if counted {
            DiscussionRepository::increment_view_count_on(&txn, discussion_id).await?;
        } else {
            tracing::debug!(viewer = %viewer, discussion_id, %today, "Repeat view not counted");
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(counted)
    }
}
