//! Persistence - PostgreSQL via SeaORM and an in-memory fallback.

pub mod memory;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

pub use memory::{
    InMemoryCategoryRepository, InMemoryCommentRepository, InMemoryLocationRepository,
    InMemoryPostRepository, InMemoryRepository, InMemoryStore, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect};
#[cfg(feature = "postgres")]
pub use sea_orm::{DbConn, DbErr};
#[cfg(feature = "postgres")]
pub use postgres_base::PostgresBaseRepository;
#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};
