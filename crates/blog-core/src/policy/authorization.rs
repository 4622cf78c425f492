//! Mutation rights on authored records.

use uuid::Uuid;

use super::Viewer;
use crate::domain::{Comment, Post};
use crate::error::DomainError;

/// Mutations guarded by authorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Update,
    Delete,
}

/// A record owned by a single user.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Allow `action` on `record` only when `actor` wrote it.
///
/// `action` does not change the outcome today; both mutations require
/// authorship.
pub fn authorize<R: Authored + ?Sized>(
    actor: &Viewer,
    record: &R,
    _action: Action,
) -> Result<(), DomainError> {
    if actor.is(record.author_id()) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_author_may_update_and_delete() {
        let alice = Uuid::new_v4();
        let post = Post::new(alice, "t".into(), "x".into(), Utc::now());

        assert!(authorize(&Viewer::User(alice), &post, Action::Update).is_ok());
        assert!(authorize(&Viewer::User(alice), &post, Action::Delete).is_ok());
    }

    #[test]
    fn test_other_user_is_denied() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let comment = Comment::new(Uuid::new_v4(), alice, "hi".into());

        let result = authorize(&Viewer::User(bob), &comment, Action::Delete);
        assert!(matches!(result, Err(DomainError::PermissionDenied)));
    }

    #[test]
    fn test_anonymous_is_denied() {
        let post = Post::new(Uuid::new_v4(), "t".into(), "x".into(), Utc::now());

        let result = authorize(&Viewer::Anonymous, &post, Action::Update);
        assert!(matches!(result, Err(DomainError::PermissionDenied)));
    }
}
