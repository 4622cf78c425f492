//! Domain-level error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }

    /// Shorthand for a validation failure on one field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
