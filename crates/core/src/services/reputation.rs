//! Reputation service: point balances, levels and voting power.

use std::{fmt, sync::Arc};

use saythat_common::{AppError, AppResult, VoterKey};
use saythat_db::{entities::reputation, repositories::ReputationRepository};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use serde::Serialize;

/// Reputation tier, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Skull,
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Level {
    /// Minimum points for each tier, paired with the tier.
    const THRESHOLDS: [(i64, Self); 5] = [
        (10_000_000, Self::Diamond),
        (1_000_000, Self::Gold),
        (100_000, Self::Silver),
        (10_000, Self::Bronze),
        (0, Self::Skull),
    ];

    /// Tier for a point balance. A balance equal to a threshold belongs to
    /// the higher tier.
    #[must_use]
    pub fn from_points(points: i64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| points >= *min)
            .map_or(Self::Skull, |(_, level)| *level)
    }

    /// Tally weight of a single vote cast at this tier.
    #[must_use]
    pub const fn voting_power(self) -> i64 {
        match self {
            Self::Skull => 1,
            Self::Bronze => 2,
            Self::Silver => 4,
            Self::Gold => 8,
            Self::Diamond => 16,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Skull => "skull",
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Diamond => "diamond",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Skull => "💀",
            Self::Bronze => "🥉",
            Self::Silver => "🥈",
            Self::Gold => "🥇",
            Self::Diamond => "💎",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A user's balance with its derived tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub user_id: String,
    pub points: i64,
    pub level: Level,
    pub voting_power: i64,
    pub icon: &'static str,
}

impl Standing {
    fn new(user_id: String, points: i64) -> Self {
        let level = Level::from_points(points);
        Self {
            user_id,
            points,
            level,
            voting_power: level.voting_power(),
            icon: level.icon(),
        }
    }
}

/// Reputation service for business logic.
#[derive(Clone)]
pub struct ReputationService {
    db: Arc<DatabaseConnection>,
    reputation_repo: ReputationRepository,
}

impl ReputationService {
    /// Create a new reputation service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, reputation_repo: ReputationRepository) -> Self {
        Self {
            db,
            reputation_repo,
        }
    }

    /// Return the user's record, creating an empty one on first use.
    pub async fn get_or_create(&self, user_id: &str) -> AppResult<reputation::Model> {
        self.reputation_repo.get_or_create(user_id).await
    }

    /// Current standing of a user. Users without a record stand at zero.
    pub async fn standing(&self, user_id: &str) -> AppResult<Standing> {
        let points = self
            .reputation_repo
            .find_by_user_id(user_id)
            .await?
            .map_or(0, |r| r.points);

        Ok(Standing::new(user_id.to_string(), points))
    }

    /// Add points to a user's balance and return the new total.
    ///
    /// Anonymous authors (`None`) never accrue reputation, and a zero award
    /// changes nothing; both are no-ops returning `None`.
    pub async fn award(
        &self,
        user_id: Option<&str>,
        points: i64,
        reason: &str,
    ) -> AppResult<Option<i64>> {
        Self::award_on(self.db.as_ref(), user_id, points, reason).await
    }

    /// [`Self::award`] on the given connection or transaction.
    pub async fn award_on<C: ConnectionTrait>(
        conn: &C,
        user_id: Option<&str>,
        points: i64,
        reason: &str,
    ) -> AppResult<Option<i64>> {
        let Some(user_id) = user_id.filter(|_| points != 0) else {
            return Ok(None);
        };

        if points < 0 {
            return Err(AppError::BadRequest(format!(
                "Award must be positive, got {points}"
            )));
        }

        let total = ReputationRepository::award_on(conn, user_id, points).await?;

        tracing::info!(user_id = %user_id, points, total, reason, "Awarded reputation points");

        Ok(Some(total))
    }

    /// Derive tier and voting power from a record.
    #[must_use]
    pub fn level_and_power(record: &reputation::Model) -> (Level, i64) {
        let level = Level::from_points(record.points);
        (level, level.voting_power())
    }

    /// Voting power of `voter` right now.
    ///
    /// Anonymous voters and users without a record vote with power 1.
    pub async fn voting_power_on<C: ConnectionTrait>(conn: &C, voter: &VoterKey) -> AppResult<i64> {
        let Some(user_id) = voter.user_id() else {
            return Ok(Level::Skull.voting_power());
        };

        Ok(ReputationRepository::find_by_user_id_on(conn, user_id)
            .await?
            .map_or(Level::Skull.voting_power(), |r| {
                Self::level_and_power(&r).1
            }))
    }
}
