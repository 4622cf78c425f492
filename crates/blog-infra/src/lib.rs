//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `auth` - JWT + Argon2 authentication
//! - `rate-limit` - Rate limiting via governor
//!
//! With no features only [`InMemoryStore`] is built.

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use database::InMemoryStore;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
