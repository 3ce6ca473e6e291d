//! Comment service.

use std::sync::Arc;

use chrono::Utc;
use saythat_common::{
    AppError, AppResult, IdGenerator, VoterKey,
    config::{ListingConfig, PointsConfig},
};
use saythat_db::{
    entities::comment::{self, Stance},
    repositories::{CommentRepository, DiscussionRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use crate::services::reputation::ReputationService;

/// Input for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub discussion_id: String,

    #[validate(length(min = 1, max = 2000))]
    pub content: String,

    /// Side of the discussion the comment argues for.
    pub stance: Stance,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    db: Arc<DatabaseConnection>,
    comment_repo: CommentRepository,
    discussion_repo: DiscussionRepository,
    points: PointsConfig,
    listing: ListingConfig,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        comment_repo: CommentRepository,
        discussion_repo: DiscussionRepository,
        points: PointsConfig,
        listing: ListingConfig,
    ) -> Self {
        Self {
            db,
            comment_repo,
            discussion_repo,
            points,
            listing,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment on a discussion and reward a durable author.
    pub async fn create(
        &self,
        author: &VoterKey,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if DiscussionRepository::find_by_id_on(&txn, &input.discussion_id)
            .await?
            .is_none()
        {
            return Err(AppError::DiscussionNotFound(input.discussion_id));
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            discussion_id: Set(input.discussion_id.clone()),
            user_id: Set(author.user_id().map(ToString::to_string)),
            session_id: Set(author.session_token().map(ToString::to_string)),
            content: Set(input.content),
            stance: Set(input.stance),
            upvote_count: Set(0),
            downvote_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        let created = CommentRepository::create_on(&txn, model).await?;
        DiscussionRepository::increment_comment_count_on(&txn, &input.discussion_id).await?;
        ReputationService::award_on(&txn, author.user_id(), self.points.comment, "comment").await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(
            comment_id = %created.id,
            discussion_id = %created.discussion_id,
            author = %author,
            "Comment created"
        );

        Ok(created)
    }

    /// All comments on a discussion, oldest first.
    pub async fn list(&self, discussion_id: &str) -> AppResult<Vec<comment::Model>> {
        self.discussion_repo.get_by_id(discussion_id).await?;
        self.comment_repo.find_by_discussion(discussion_id).await
    }

    /// The most up-voted comments on a discussion.
    pub async fn best(&self, discussion_id: &str) -> AppResult<Vec<comment::Model>> {
        self.discussion_repo.get_by_id(discussion_id).await?;
        self.comment_repo
            .find_best(discussion_id, self.listing.best_comments)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use saythat_db::entities::discussion;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_discussion(id: &str) -> discussion::Model {
        discussion::Model {
            id: id.to_string(),
            subject: "Vim or Emacs".to_string(),
            content: String::new(),
            user_id: None,
            session_id: Some("s-author".to_string()),
            agree_count: 0,
            disagree_count: 0,
            view_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn create_test_comment(id: &str, up: i64) -> comment::Model {
        comment::Model {
            id: id.to_string(),
            discussion_id: "d1".to_string(),
            user_id: None,
            session_id: Some("s1".to_string()),
            content: "Vim, obviously".to_string(),
            stance: Stance::Agree,
            upvote_count: up,
            downvote_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> CommentService {
        let db = Arc::new(db.into_connection());
        CommentService::new(
            db.clone(),
            CommentRepository::new(db.clone()),
            DiscussionRepository::new(db),
            PointsConfig::default(),
            ListingConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_create_anonymous_comment() {
        // Anonymous author: no reputation query.
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion("d1")]])
                .append_query_results([[create_test_comment("c1", 0)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
        );
        let author = VoterKey::Anonymous("s1".to_string());

        let created = service
            .create(
                &author,
                CreateCommentInput {
                    discussion_id: "d1".to_string(),
                    content: "Vim, obviously".to_string(),
                    stance: Stance::Agree,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.stance, Stance::Agree);
        assert_eq!(created.session_id.as_deref(), Some("s1"));
    }

    #[tokio::test]
    async fn test_create_on_missing_discussion() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<discussion::Model>::new()]),
        );
        let author = VoterKey::Anonymous("s1".to_string());

        let result = service
            .create(
                &author,
                CreateCommentInput {
                    discussion_id: "missing".to_string(),
                    content: "Hello".to_string(),
                    stance: Stance::Disagree,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::DiscussionNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_content() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let author = VoterKey::Anonymous("s1".to_string());

        let result = service
            .create(
                &author,
                CreateCommentInput {
                    discussion_id: "d1".to_string(),
                    content: String::new(),
                    stance: Stance::Agree,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_best() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion("d1")]])
                .append_query_results([[create_test_comment("c2", 7), create_test_comment("c1", 2)]]),
        );

        let best = service.best("d1").await.unwrap();
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].id, "c2");
    }
}
