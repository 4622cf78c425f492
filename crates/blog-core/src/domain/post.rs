use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Category, Location};

/// Post entity - a blog publication, possibly scheduled for the future.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    /// Publication time; a future value schedules the post.
    pub pub_date: DateTime<Utc>,
    /// Reference to an uploaded image, if any.
    pub image: Option<String>,
    pub is_published: bool,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            text,
            pub_date,
            image: None,
            is_published: true,
            location_id: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_category(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn with_location(mut self, location_id: Option<Uuid>) -> Self {
        self.location_id = location_id;
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }
}

/// A post with its relations loaded and the number of comments attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
