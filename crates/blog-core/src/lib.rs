//! # Blog Core
//!
//! The domain layer of the blog service: entities, the post visibility and
//! authorization policy, pagination and form checks.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod validation;

pub use error::{DomainError, FieldError, RepoError};
