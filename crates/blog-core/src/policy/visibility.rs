//! Post visibility rules.
//!
//! A post is *live* when it is published, its publication time has passed and
//! its category (if it has one) is published. Authors always see their own
//! posts; everyone else only sees live ones.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    pub fn is(&self, user_id: Uuid) -> bool {
        self.user_id() == Some(user_id)
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(Viewer::Anonymous, Viewer::User)
    }
}

/// How posts without a category are treated by the category gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UncategorizedPolicy {
    /// No category means nothing gates the post.
    #[default]
    Public,
    /// A post must belong to a published category to go live.
    Hidden,
}

/// Visibility rule set shared by every post listing and the detail view.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityPolicy {
    pub uncategorized: UncategorizedPolicy,
}

impl VisibilityPolicy {
    pub fn new(uncategorized: UncategorizedPolicy) -> Self {
        Self { uncategorized }
    }

    /// Whether the post's category lets it through.
    ///
    /// `category` must be the category referenced by `post.category_id`.
    pub fn category_allows(&self, post: &Post, category: Option<&Category>) -> bool {
        match (post.category_id, category) {
            (None, _) => self.uncategorized == UncategorizedPolicy::Public,
            (Some(_), Some(category)) => category.is_published,
            // Dangling reference: nothing to vouch for the post.
            (Some(_), None) => false,
        }
    }

    pub fn is_live(&self, post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
        post.is_published && post.pub_date <= now && self.category_allows(post, category)
    }

    pub fn is_visible(
        &self,
        post: &Post,
        category: Option<&Category>,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> bool {
        viewer.is(post.author_id) || self.is_live(post, category, now)
    }
}

/// Scope of a post listing.
///
/// The base collection is all posts, narrowed to one author and/or one
/// category; the visibility rule is then applied for `viewer` at `now`.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub viewer: Viewer,
    pub now: DateTime<Utc>,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl PostQuery {
    pub fn new(viewer: Viewer, now: DateTime<Utc>) -> Self {
        Self {
            viewer,
            now,
            author_id: None,
            category_id: None,
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Whether a post falls inside the base collection (before visibility).
    pub fn in_scope(&self, post: &Post) -> bool {
        self.author_id.is_none_or(|id| post.author_id == id)
            && self.category_id.is_none_or(|id| post.category_id == Some(id))
    }
}
