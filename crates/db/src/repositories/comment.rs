//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use saythat_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID on the given connection or transaction.
    pub async fn find_by_id_on<C: ConnectionTrait>(
        conn: &C,
        id: &str,
    ) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        Self::find_by_id_on(self.db.as_ref(), id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment on the given connection or transaction.
    pub async fn create_on<C: ConnectionTrait>(
        conn: &C,
        model: comment::ActiveModel,
    ) -> AppResult<comment::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comments on a discussion, oldest first.
    pub async fn find_by_discussion(&self, discussion_id: &str) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::DiscussionId.eq(discussion_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// The most up-voted comments on a discussion.
    ///
    /// Comments without any up-votes are never "best".
    pub async fn find_best(
        &self,
        discussion_id: &str,
        limit: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::DiscussionId.eq(discussion_id))
            .filter(comment::Column::UpvoteCount.gt(0))
            .order_by_desc(comment::Column::UpvoteCount)
            .order_by_asc(comment::Column::CreatedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add `amount` to the up or down tally and return the updated row.
    pub async fn add_to_tally_on<C: ConnectionTrait>(
        conn: &C,
        id: &str,
        up: bool,
        amount: i64,
    ) -> AppResult<comment::Model> {
        let column = if up {
            comment::Column::UpvoteCount
        } else {
            comment::Column::DownvoteCount
        };

        Comment::update_many()
            .col_expr(column, Expr::col(column).add(amount))
            .filter(comment::Column::Id.eq(id))
            .exec_with_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }
}
