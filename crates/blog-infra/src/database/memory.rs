//! In-memory repositories - used when no database is configured and in tests.
//!
//! All repositories share one [`InMemoryStore`] so that the schema's
//! referential rules (cascades and `SET NULL`) behave as they do in
//! PostgreSQL.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{
    Author, Category, Comment, CommentView, Location, Post, PostView, User,
};
use blog_core::error::RepoError;
use blog_core::pagination::{PageRequest, Paginated};
use blog_core::policy::{PostQuery, VisibilityPolicy};
use blog_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    locations: Vec<Location>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

impl Tables {
    fn author(&self, id: Uuid) -> Option<Author> {
        self.users.iter().find(|u| u.id == id).map(Author::from)
    }

    fn category(&self, id: Option<Uuid>) -> Option<&Category> {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
    }

    fn location(&self, id: Option<Uuid>) -> Option<&Location> {
        id.and_then(|id| self.locations.iter().find(|l| l.id == id))
    }

    fn view(&self, post: &Post, counts: &HashMap<Uuid, u64>) -> Result<PostView, RepoError> {
        let author = self.author(post.author_id).ok_or_else(|| {
            RepoError::Query(format!("Author {} of post {} missing", post.author_id, post.id))
        })?;

        Ok(PostView {
            post: post.clone(),
            author,
            category: self.category(post.category_id).cloned(),
            location: self.location(post.location_id).cloned(),
            comment_count: counts.get(&post.id).copied().unwrap_or(0),
        })
    }

    fn comment_counts(&self) -> HashMap<Uuid, u64> {
        let mut counts = HashMap::new();
        for comment in &self.comments {
            *counts.entry(comment.post_id).or_insert(0) += 1;
        }
        counts
    }

    fn remove_post(&mut self, id: Uuid) {
        self.posts.retain(|p| p.id != id);
        self.comments.retain(|c| c.post_id != id);
    }
}

/// Shared in-memory storage. Cloning hands out another handle to the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryRepository<User> {
        InMemoryRepository::new(self.clone())
    }

    pub fn categories(&self) -> InMemoryRepository<Category> {
        InMemoryRepository::new(self.clone())
    }

    pub fn locations(&self) -> InMemoryRepository<Location> {
        InMemoryRepository::new(self.clone())
    }

    pub fn posts(&self) -> InMemoryRepository<Post> {
        InMemoryRepository::new(self.clone())
    }

    pub fn comments(&self) -> InMemoryRepository<Comment> {
        InMemoryRepository::new(self.clone())
    }
}

/// A row type stored in [`InMemoryStore`].
trait Row: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn rows(tables: &Tables) -> &Vec<Self>;
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self>;

    /// Unique and foreign key checks before the row is written.
    fn check(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Referential actions after the row with `id` is removed.
    fn on_delete(_id: Uuid, _tables: &mut Tables) {}
}

fn conflict(what: &str) -> RepoError {
    RepoError::Constraint(format!("{what} already exists"))
}

fn missing(what: &str) -> RepoError {
    RepoError::Constraint(format!("Referenced {what} does not exist"))
}

impl Row for User {
    fn id(&self) -> Uuid {
        self.id
    }
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.users
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.users
    }
    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        let others = tables.users.iter().filter(|u| u.id != self.id);
        for other in others {
            if other.username == self.username {
                return Err(conflict("Username"));
            }
            if other.email == self.email {
                return Err(conflict("Email"));
            }
        }
        Ok(())
    }
    fn on_delete(id: Uuid, tables: &mut Tables) {
        let owned: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|c| c.author_id != id);
    }
}

impl Row for Category {
    fn id(&self) -> Uuid {
        self.id
    }
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.categories
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.categories
    }
    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .categories
            .iter()
            .any(|c| c.id != self.id && c.slug == self.slug)
        {
            return Err(conflict("Slug"));
        }
        Ok(())
    }
    fn on_delete(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.iter_mut().filter(|p| p.category_id == Some(id)) {
            post.category_id = None;
        }
    }
}

impl Row for Location {
    fn id(&self) -> Uuid {
        self.id
    }
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.locations
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.locations
    }
    fn on_delete(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.iter_mut().filter(|p| p.location_id == Some(id)) {
            post.location_id = None;
        }
    }
}

impl Row for Post {
    fn id(&self) -> Uuid {
        self.id
    }
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.posts
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.posts
    }
    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.iter().any(|u| u.id == self.author_id) {
            return Err(missing("author"));
        }
        if self.category_id.is_some() && tables.category(self.category_id).is_none() {
            return Err(missing("category"));
        }
        if self.location_id.is_some() && tables.location(self.location_id).is_none() {
            return Err(missing("location"));
        }
        Ok(())
    }
    fn on_delete(id: Uuid, tables: &mut Tables) {
        tables.comments.retain(|c| c.post_id != id);
    }
}

impl Row for Comment {
    fn id(&self) -> Uuid {
        self.id
    }
    fn rows(tables: &Tables) -> &Vec<Self> {
        &tables.comments
    }
    fn rows_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.comments
    }
    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.iter().any(|p| p.id == self.post_id) {
            return Err(missing("post"));
        }
        if !tables.users.iter().any(|u| u.id == self.author_id) {
            return Err(missing("author"));
        }
        Ok(())
    }
}

/// Generic in-memory repository over one table of the shared store.
pub struct InMemoryRepository<T> {
    store: InMemoryStore,
    _entity: PhantomData<T>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;
pub type InMemoryLocationRepository = InMemoryRepository<Location>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

#[allow(private_bounds)]
#[async_trait]
impl<T: Row> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(T::rows(&tables).iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        if T::rows(&tables).iter().any(|r| r.id() == entity.id()) {
            return Err(conflict("Entity"));
        }
        entity.check(&tables)?;
        T::rows_mut(&mut tables).push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.store.tables.write().await;
        entity.check(&tables)?;
        let slot = T::rows_mut(&mut tables)
            .iter_mut()
            .find(|r| r.id() == entity.id())
            .ok_or(RepoError::NotFound)?;
        *slot = entity.clone();
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;
        let rows = T::rows_mut(&mut tables);
        let before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == before {
            return Err(RepoError::NotFound);
        }
        T::on_delete(id, &mut tables);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut categories = tables.categories.clone();
        categories.sort_by_key(|c| c.created_at);
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut locations = tables.locations.clone();
        locations.sort_by_key(|l| l.created_at);
        Ok(locations)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn visible_posts(
        &self,
        policy: &VisibilityPolicy,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Paginated<PostView>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut matching: Vec<&Post> = tables
            .posts
            .iter()
            .filter(|p| query.in_scope(p))
            .filter(|p| {
                policy.is_visible(p, tables.category(p.category_id), &query.viewer, query.now)
            })
            .collect();

        matching.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.id.cmp(&b.id))
        });

        let total = matching.len() as u64;
        let counts = tables.comment_counts();
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.size as usize)
            .map(|p| tables.view(p, &counts))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(items, page, total))
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let tables = self.store.tables.read().await;
        let counts = tables.comment_counts();
        tables
            .posts
            .iter()
            .find(|p| p.id == id)
            .map(|p| tables.view(p, &counts))
            .transpose()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.store.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by_key(|c| c.created_at);

        comments
            .into_iter()
            .map(|c| {
                let author = tables.author(c.author_id).ok_or_else(|| {
                    RepoError::Query(format!("Author of comment {} missing", c.id))
                })?;
                Ok(CommentView {
                    comment: c.clone(),
                    author,
                })
            })
            .collect()
    }
}
