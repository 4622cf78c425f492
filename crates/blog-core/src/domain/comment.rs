use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Author;

/// Comment entity - a reply left on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}

/// A comment together with its author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Author,
}
