use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - a published or hidden topic that groups posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Unique URL identifier.
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(title: String, description: String, slug: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}
