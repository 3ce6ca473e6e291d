//! Reputation repository.

use std::sync::Arc;

use crate::{
    entities::{Reputation, reputation},
    is_unique_violation,
};
use chrono::Utc;
use saythat_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set,
    sea_query::{Expr, OnConflict},
};

/// Reputation repository for database operations.
#[derive(Clone)]
pub struct ReputationRepository {
    db: Arc<DatabaseConnection>,
}

impl ReputationRepository {
    /// Create a new reputation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the reputation record of a user.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<reputation::Model>> {
        Self::find_by_user_id_on(self.db.as_ref(), user_id).await
    }

    /// Find the reputation record of a user on the given connection or transaction.
    pub async fn find_by_user_id_on<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
    ) -> AppResult<Option<reputation::Model>> {
        Reputation::find_by_id(user_id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Return the user's record, creating one with zero points if absent.
    pub async fn get_or_create(&self, user_id: &str) -> AppResult<reputation::Model> {
        if let Some(existing) = self.find_by_user_id(user_id).await? {
            return Ok(existing);
        }

        match Self::insert_on(self.db.as_ref(), user_id, 0).await {
            Ok(created) => Ok(created),
            // Another request created it first.
            Err(e) if is_unique_violation(&e) => self
                .find_by_user_id(user_id)
                .await?
                .ok_or_else(|| AppError::Internal(format!("Reputation for {user_id} vanished"))),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Add `amount` points to a user and return the new total.
    ///
    /// A single `INSERT ... ON CONFLICT DO UPDATE`: the first award creates
    /// the record, later ones increment it in place. Concurrent first awards
    /// wait on the primary key and then take the update branch, so the
    /// statement is safe inside a larger transaction.
    pub async fn award_on<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        amount: i64,
    ) -> AppResult<i64> {
        let now = Utc::now();
        let model = reputation::ActiveModel {
            user_id: Set(user_id.to_string()),
            points: Set(amount),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let record = Reputation::insert(model)
            .on_conflict(
                OnConflict::column(reputation::Column::UserId)
                    .value(
                        reputation::Column::Points,
                        Expr::col((Reputation, reputation::Column::Points)).add(amount),
                    )
                    .value(reputation::Column::UpdatedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_with_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(record.points)
    }

    async fn insert_on<C: ConnectionTrait>(
        conn: &C,
        user_id: &str,
        points: i64,
    ) -> Result<reputation::Model, sea_orm::DbErr> {
        let now = Utc::now();
        reputation::ActiveModel {
            user_id: Set(user_id.to_string()),
            points: Set(points),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(conn)
        .await
    }
}
