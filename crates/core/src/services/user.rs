//! User service.

use chrono::Utc;
use saythat_common::{AppError, AppResult, IdGenerator};
use saythat_db::{
    entities::user,
    repositories::{ReputationRepository, UserRepository},
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Profile handed over by an external login provider after its token
/// exchange has completed.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    #[validate(length(min = 1, max = 32))]
    pub provider: String,

    #[validate(length(min = 1, max = 256))]
    pub provider_id: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 200))]
    pub nick: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    reputation_repo: ReputationRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, reputation_repo: ReputationRepository) -> Self {
        Self {
            user_repo,
            reputation_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Sign in through an external provider, registering on first login.
    ///
    /// The user is guaranteed an access token and a reputation record.
    pub async fn find_or_create_by_provider(
        &self,
        profile: ProviderProfile,
    ) -> AppResult<user::Model> {
        profile.validate()?;

        let user = match self
            .user_repo
            .find_by_provider(&profile.provider, &profile.provider_id)
            .await?
        {
            Some(existing) if existing.token.is_some() => existing,
            Some(existing) => {
                self.user_repo
                    .set_token(&existing.id, &self.id_gen.generate_token())
                    .await?
            }
            None => {
                let model = user::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    nick: Set(profile.nick),
                    email: Set(profile.email),
                    provider: Set(profile.provider),
                    provider_id: Set(profile.provider_id),
                    token: Set(Some(self.id_gen.generate_token())),
                    created_at: Set(Utc::now().into()),
                };
                let created = self.user_repo.insert_or_find(model).await?;
                tracing::info!(user_id = %created.id, provider = %created.provider, "User registered");
                created
            }
        };

        self.reputation_repo.get_or_create(&user.id).await?;

        Ok(user)
    }

    /// Sign out everywhere by revoking the user's access token.
    ///
    /// The next provider login issues a fresh one.
    pub async fn sign_out(&self, id: &str) -> AppResult<()> {
        self.user_repo.clear_token(id).await?;
        tracing::info!(user_id = %id, "User signed out");
        Ok(())
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
