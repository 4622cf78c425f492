//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use blog_core::pagination::DEFAULT_PAGE_SIZE;
use blog_core::policy::UncategorizedPolicy;

/// Connection settings, present when `DATABASE_URL` is set.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseSettings>,
    pub posts_per_page: u64,
    pub uncategorized: UncategorizedPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseSettings {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_var("DB_MIN_CONNECTIONS", 2),
        });

        let uncategorized = if parse_var("UNCATEGORIZED_POSTS_PUBLIC", true) {
            UncategorizedPolicy::Public
        } else {
            UncategorizedPolicy::Hidden
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            database,
            posts_per_page: parse_var("POSTS_PER_PAGE", DEFAULT_PAGE_SIZE).max(1),
            uncategorized,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
