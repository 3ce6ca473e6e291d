//! Discussion repository.

use std::sync::Arc;

use crate::entities::{Discussion, discussion};
use chrono::{DateTime, Utc};
use saythat_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

/// Discussion repository for database operations.
#[derive(Clone)]
pub struct DiscussionRepository {
    db: Arc<DatabaseConnection>,
}

impl DiscussionRepository {
    /// Create a new discussion repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a discussion by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<discussion::Model>> {
        Self::find_by_id_on(self.db.as_ref(), id).await
    }

    /// Find a discussion by ID on the given connection or transaction.
    pub async fn find_by_id_on<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<discussion::Model>> {
        Discussion::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a discussion by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<discussion::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DiscussionNotFound(id.to_string()))
    }

    /// Create a new discussion on the given connection or transaction.
    pub async fn create_on<C: ConnectionTrait>(
        conn: &C,
        model: discussion::ActiveModel,
    ) -> AppResult<discussion::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List discussions, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<discussion::Model>> {
        Discussion::find()
            .order_by_desc(discussion::Column::CreatedAt)
            .order_by_desc(discussion::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Discussions created since `since`, most voted first.
    pub async fn find_trending(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<discussion::Model>> {
        Discussion::find()
            .filter(discussion::Column::CreatedAt.gte(since))
            .order_by_desc(
                Expr::col(discussion::Column::AgreeCount)
                    .add(Expr::col(discussion::Column::DisagreeCount)),
            )
            .order_by_desc(discussion::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add `amount` to the agree or disagree tally and return the updated row.
    ///
    /// Single `UPDATE ... RETURNING`, so concurrent votes never lose an
    /// increment.
    pub async fn add_to_tally_on<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        agree: bool,
        amount: i64,
    ) -> AppResult<discussion::Model> {
        let column = if agree {
            discussion::Column::AgreeCount
        } else {
            discussion::Column::DisagreeCount
        };

        Discussion::update_many()
            .col_expr(column, Expr::col(column).add(amount))
            .filter(discussion::Column::Id.eq(id))
            .exec_with_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::DiscussionNotFound(id.to_string()))
    }

    /// Increment view count atomically.
    pub async fn increment_view_count_on<C: ConnectionTrait>(conn: &C, id: &str) -> AppResult<()> {
        Discussion::update_many()
            .col_expr(
                discussion::Column::ViewCount,
                Expr::col(discussion::Column::ViewCount).add(1),
            )
            .filter(discussion::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment comment count atomically.
    pub async fn increment_comment_count_on<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        Discussion::update_many()
            .col_expr(
                discussion::Column::CommentCount,
                Expr::col(discussion::Column::CommentCount).add(1),
            )
            .filter(discussion::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_discussion(id: &str, agree: i64, disagree: i64) -> discussion::Model {
        discussion::Model {
            id: id.to_string(),
            subject: "Pineapple belongs on pizza".to_string(),
            content: "Discuss.".to_string(),
            user_id: Some("author1".to_string()),
            session_id: None,
            agree_count: agree,
            disagree_count: disagree,
            view_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<discussion::Model>::new()])
                .into_connection(),
        );

        let repo = DiscussionRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::DiscussionNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected DiscussionNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_list_returns_page() {
        let d1 = create_test_discussion("d1", 0, 0);
        let d2 = create_test_discussion("d2", 3, 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[d2, d1]])
                .into_connection(),
        );

        let repo = DiscussionRepository::new(db);
        let result = repo.list(5, 0).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "d2");
    }

    #[tokio::test]
    async fn test_add_to_tally_returns_updated_row() {
        let updated = create_test_discussion("d1", 2, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[updated]])
            .into_connection();

        let result = DiscussionRepository::add_to_tally_on(&db, "d1", true, 2)
            .await
            .unwrap();

        assert_eq!(result.agree_count, 2);
        assert_eq!(result.disagree_count, 0);
    }

    #[tokio::test]
    async fn test_add_to_tally_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<discussion::Model>::new()])
            .into_connection();

        let result = DiscussionRepository::add_to_tally_on(&db, "gone", false, 1).await;

        assert!(matches!(result, Err(AppError::DiscussionNotFound(_))));
    }

    #[tokio::test]
    async fn test_increment_view_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = DiscussionRepository::increment_view_count_on(&db, "d1").await;
        assert!(result.is_ok());
    }
}
