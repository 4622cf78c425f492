use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentView, Location, Post, PostView, User};
use crate::error::RepoError;
use crate::pagination::{PageRequest, Paginated};
use crate::policy::{PostQuery, VisibilityPolicy};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, applying the schema's cascade rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories, oldest first.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// All locations, oldest first.
    async fn list(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts in `query`'s scope that its viewer may see, newest `pub_date`
    /// first, with relations and comment counts loaded.
    async fn visible_posts(
        &self,
        policy: &VisibilityPolicy,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Paginated<PostView>, RepoError>;

    /// Load a single post with its relations, ignoring visibility.
    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}
