//! Collecting field errors for one form.
//!
//! Field-local rules run first; the handler then adds what only storage
//! can answer, so a rejected form reports every problem at once.

use crate::error::{DomainError, FieldError};

/// Accumulates field errors for one form.
#[derive(Debug, Default)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    /// Whether `field` already has a problem.
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Turn the collected errors into a result.
    pub fn finish(self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }
}

impl From<Vec<FieldError>> for FormErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_error() {
        let mut form = FormErrors::from(vec![FieldError::new("title", "This field is required.")]);
        form.add("category_id", "Select a valid choice.")
            .add("text", "This field is required.");

        assert!(form.has("category_id"));
        assert!(!form.has("slug"));

        match form.finish() {
            Err(DomainError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "category_id", "text"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_clean_form_passes() {
        let form = FormErrors::new();
        assert!(form.is_empty());
        assert!(form.finish().is_ok());
    }
}
