//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use saythat_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find the owner of an access token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the account linked to an external login.
    pub async fn find_by_provider(
        &self,
        provider: &str,
        provider_id: &str,
    ) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Provider.eq(provider))
            .filter(user::Column::ProviderId.eq(provider_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Register a user. If a concurrent first login for the same external
    /// account won the insert, that account is returned instead.
    pub async fn insert_or_find(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        let provider = model.provider.clone().take().unwrap_or_default();
        let provider_id = model.provider_id.clone().take().unwrap_or_default();

        match model.insert(self.db.as_ref()).await {
            Ok(created) => Ok(created),
            Err(e) if crate::is_unique_violation(&e) => self
                .find_by_provider(&provider, &provider_id)
                .await?
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Give a user a new access token.
    pub async fn set_token(&self, id: &str, token: &str) -> AppResult<user::Model> {
        User::update_many()
            .col_expr(user::Column::Token, Expr::value(token))
            .filter(user::Column::Id.eq(id))
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Revoke a user's access token.
    pub async fn clear_token(&self, id: &str) -> AppResult<()> {
        let result = User::update_many()
            .col_expr(user::Column::Token, Expr::value(Option::<String>::None))
            .filter(user::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::UserNotFound(id.to_string()));
        }
        Ok(())
    }
}
