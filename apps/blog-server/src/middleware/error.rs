//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blog_core::error::{DomainError, FieldError, RepoError};
use blog_core::ports::AuthError;
use blog_shared::{ErrorResponse, FieldMessage};
use std::fmt;
use validator::ValidationErrors;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden,
    Conflict(String),
    Internal(String),
    Validation(Vec<FieldError>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden => ErrorResponse::forbidden()
                .with_detail("You are not allowed to perform this action."),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::new(422, "Validation Failed")
                .with_detail("The submitted form has errors.")
                .with_errors(
                    errors
                        .iter()
                        .map(|e| FieldMessage {
                            field: e.field.clone(),
                            message: e.message.clone(),
                        })
                        .collect(),
                ),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Validation(errors) => AppError::Validation(errors),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::PermissionDenied => AppError::Forbidden,
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&err))
    }
}

/// Flatten `validator` output, ordered by field name.
pub fn field_errors(err: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<_> = err.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                let message = e.message.as_deref().unwrap_or(&*e.code);
                FieldError::new(field.to_string(), message)
            })
        })
        .collect()
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth => AppError::Unauthorized,
            AuthError::InsufficientPermissions => AppError::Forbidden,
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
