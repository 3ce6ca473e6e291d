//! Application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Anonymous session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Reputation point awards.
    #[serde(default)]
    pub points: PointsConfig,
    /// Listing sizes.
    #[serde(default)]
    pub listing: ListingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Anonymous session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Cookie lifetime in days.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: i64,
    /// Whether the cookie is only sent over HTTPS.
    #[serde(default)]
    pub secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_days: default_max_age_days(),
            secure: false,
        }
    }
}

/// Points awarded to authors for activity on their content.
#[derive(Debug, Clone, Deserialize)]
pub struct PointsConfig {
    /// Creating a discussion.
    #[serde(default = "default_points_post")]
    pub post: i64,
    /// Creating a comment.
    #[serde(default = "default_points_comment")]
    pub comment: i64,
    /// Receiving any vote on a discussion, or a down-vote on a comment.
    #[serde(default = "default_points_one")]
    pub vote_received: i64,
    /// Receiving an up-vote on a comment.
    #[serde(default = "default_points_one")]
    pub comment_upvote: i64,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            post: default_points_post(),
            comment: default_points_comment(),
            vote_received: default_points_one(),
            comment_upvote: default_points_one(),
        }
    }
}

/// Page sizes for listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingConfig {
    /// Discussions per page.
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Number of "best" comments shown per discussion.
    #[serde(default = "default_best_comments")]
    pub best_comments: u64,
    /// Number of trending discussions per period.
    #[serde(default = "default_page_size")]
    pub trending_limit: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            best_comments: default_best_comments(),
            trending_limit: default_page_size(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_cookie_name() -> String {
    "saythat_session".to_string()
}

const fn default_max_age_days() -> i64 {
    30
}

const fn default_points_post() -> i64 {
    10
}

const fn default_points_comment() -> i64 {
    5
}

const fn default_points_one() -> i64 {
    1
}

const fn default_page_size() -> u64 {
    5
}

const fn default_best_comments() -> u64 {
    3
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SAYTHAT_ENV`)
    /// 3. Environment variables with `SAYTHAT_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SAYTHAT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SAYTHAT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
