//! Discussion service.

use std::{str::FromStr, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use saythat_common::{
    AppError, AppResult, IdGenerator, VoterKey,
    config::{ListingConfig, PointsConfig},
};
use saythat_db::{entities::discussion, repositories::DiscussionRepository};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;
use validator::Validate;

use crate::services::{reputation::ReputationService, scoring::Tally};

/// Input for creating a new discussion.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionInput {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,

    #[validate(length(min = 1, max = 10000))]
    pub content: String,
}

/// A discussion with its tally split.
#[derive(Debug, Clone)]
pub struct DiscussionWithTally {
    pub discussion: discussion::Model,
    pub agree_percent: i64,
    pub disagree_percent: i64,
    pub total_votes: i64,
}

impl From<discussion::Model> for DiscussionWithTally {
    fn from(discussion: discussion::Model) -> Self {
        let tally = Tally::new(discussion.agree_count, discussion.disagree_count);
        let (agree_percent, disagree_percent) = tally.percentages();
        Self {
            discussion,
            agree_percent,
            disagree_percent,
            total_votes: tally.total(),
        }
    }
}

/// One page of the newest discussions.
#[derive(Debug, Clone)]
pub struct DiscussionPage {
    pub items: Vec<DiscussionWithTally>,
    pub page: u64,
    pub has_next: bool,
}

/// Window a trending ranking looks back over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendingPeriod {
    Realtime,
    Today,
    Weekly,
    Monthly,
}

impl TrendingPeriod {
    #[must_use]
    pub fn window(self) -> Duration {
        match self {
            Self::Realtime => Duration::hours(1),
            Self::Today => Duration::days(1),
            Self::Weekly => Duration::weeks(1),
            Self::Monthly => Duration::days(30),
        }
    }
}

impl FromStr for TrendingPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "realtime" => Ok(Self::Realtime),
            "today" => Ok(Self::Today),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(AppError::BadRequest(format!("Invalid period: {s}"))),
        }
    }
}

/// Discussion service for business logic.
#[derive(Clone)]
pub struct DiscussionService {
    db: Arc<DatabaseConnection>,
    discussion_repo: DiscussionRepository,
    points: PointsConfig,
    listing: ListingConfig,
    id_gen: IdGenerator,
}

impl DiscussionService {
    /// Create a new discussion service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        discussion_repo: DiscussionRepository,
        points: PointsConfig,
        listing: ListingConfig,
    ) -> Self {
        Self {
            db,
            discussion_repo,
            points,
            listing,
            id_gen: IdGenerator::new(),
        }
    }

    /// Start a new discussion and reward a durable author.
    pub async fn create(
        &self,
        author: &VoterKey,
        input: CreateDiscussionInput,
    ) -> AppResult<discussion::Model> {
        input.validate()?;

        let model = discussion::ActiveModel {
            id: Set(self.id_gen.generate()),
            subject: Set(input.subject.trim().to_string()),
            content: Set(input.content),
            user_id: Set(author.user_id().map(ToString::to_string)),
            session_id: Set(author.session_token().map(ToString::to_string)),
            agree_count: Set(0),
            disagree_count: Set(0),
            view_count: Set(0),
            comment_count: Set(0),
            created_at: Set(Utc::now().into()),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let created = DiscussionRepository::create_on(&txn, model).await?;
        ReputationService::award_on(&txn, author.user_id(), self.points.post, "post").await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(discussion_id = %created.id, author = %author, "Discussion created");

        Ok(created)
    }

    /// Get a discussion with its tally split.
    pub async fn get(&self, id: &str) -> AppResult<DiscussionWithTally> {
        Ok(self.discussion_repo.get_by_id(id).await?.into())
    }

    /// Newest discussions, one page at a time. Pages start at 1.
    pub async fn list(&self, page: u64) -> AppResult<DiscussionPage> {
        let page = page.max(1);
        let per_page = self.listing.page_size;
        let offset = (page - 1)
            .checked_mul(per_page)
            .filter(|o| i64::try_from(*o).is_ok())
            .ok_or_else(|| AppError::BadRequest(format!("Page {page} is out of range")))?;

        // One extra row tells whether another page follows.
        let mut rows = self.discussion_repo.list(per_page + 1, offset).await?;

        let has_next = rows.len() as u64 > per_page;
        rows.truncate(usize::try_from(per_page).unwrap_or(usize::MAX));

        Ok(DiscussionPage {
            items: rows.into_iter().map(Into::into).collect(),
            page,
            has_next,
        })
    }

    /// Most voted discussions started within the period, best first.
    pub async fn trending(&self, period: TrendingPeriod) -> AppResult<Vec<DiscussionWithTally>> {
        self.trending_since(Utc::now() - period.window()).await
    }

    async fn trending_since(&self, since: DateTime<Utc>) -> AppResult<Vec<DiscussionWithTally>> {
        let rows = self
            .discussion_repo
            .find_trending(since, self.listing.trending_limit)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use saythat_db::entities::reputation;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_discussion(id: &str, agree: i64, disagree: i64) -> discussion::Model {
        discussion::Model {
            id: id.to_string(),
            subject: "Remote work beats the office".to_string(),
            content: "Convince me.".to_string(),
            user_id: Some("author".to_string()),
            session_id: None,
            agree_count: agree,
            disagree_count: disagree,
            view_count: 0,
            comment_count: 0,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: MockDatabase) -> DiscussionService {
        let db = Arc::new(db.into_connection());
        DiscussionService::new(
            db.clone(),
            DiscussionRepository::new(db),
            PointsConfig::default(),
            ListingConfig {
                page_size: 2,
                ..ListingConfig::default()
            },
        )
    }

    #[test]
    fn test_trending_period_parse() {
        assert_eq!(
            "realtime".parse::<TrendingPeriod>().unwrap(),
            TrendingPeriod::Realtime
        );
        assert_eq!(
            "monthly".parse::<TrendingPeriod>().unwrap().window(),
            Duration::days(30)
        );
        assert!(matches!(
            "yearly".parse::<TrendingPeriod>(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_create_validates_subject() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));
        let author = VoterKey::Anonymous("s1".to_string());

        let result = service
            .create(
                &author,
                CreateDiscussionInput {
                    subject: String::new(),
                    content: "body".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_by_user_awards_post_points() {
        let reputation = reputation::Model {
            user_id: "author".to_string(),
            points: 10,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        };
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion("d1", 0, 0)]])
                .append_query_results([[reputation]]),
        );
        let author = VoterKey::Authenticated("author".to_string());

        let created = service
            .create(
                &author,
                CreateDiscussionInput {
                    subject: "Remote work beats the office".to_string(),
                    content: "Convince me.".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.id, "d1");
    }

    #[tokio::test]
    async fn test_get_reports_even_split_without_votes() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion("d1", 0, 0)]]),
        );

        let view = service.get("d1").await.unwrap();
        assert_eq!(view.agree_percent, 50);
        assert_eq!(view.disagree_percent, 50);
        assert_eq!(view.total_votes, 0);
    }

    #[tokio::test]
    async fn test_list_has_next() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_discussion("d3", 0, 0),
                create_test_discussion("d2", 0, 0),
                create_test_discussion("d1", 0, 0),
            ]]),
        );

        let page = service.list(1).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.has_next);
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_list_last_page() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_discussion("d1", 2, 2)]]),
        );

        let page = service.list(0).await.unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 1);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_list_page_out_of_range() {
        // No results queued: the request must fail before reaching the database.
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.list(u64::MAX).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = service.list(u64::try_from(i64::MAX).unwrap()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_trending() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[
                create_test_discussion("hot", 30, 10),
                create_test_discussion("warm", 3, 1),
            ]]),
        );

        let trending = service.trending(TrendingPeriod::Today).await.unwrap();
        assert_eq!(trending.len(), 2);
        assert_eq!(trending[0].discussion.id, "hot");
        assert_eq!(trending[0].agree_percent, 75);
    }
}
