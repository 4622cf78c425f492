//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blog_core::domain::{Author, Category, CommentView, Location, PostView, User};
use blog_core::error::RepoError;
use blog_core::pagination::{PageRequest, Paginated};
use blog_core::policy::{PostQuery, UncategorizedPolicy, VisibilityPolicy};
use blog_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

/// Mask the local part of an address to keep PII out of logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(1).collect();
            if local.chars().count() > 1 {
                format!("{head}***@{domain}")
            } else {
                format!("***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .order_by_asc(location::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Posts in scope of `query` that its viewer may see, unordered.
///
/// Mirrors [`VisibilityPolicy::is_visible`]: the category is left-joined so
/// that a missing row reads as "not published".
pub(crate) fn visible_select(policy: &VisibilityPolicy, query: &PostQuery) -> Select<PostEntity> {
    let category_gate = match policy.uncategorized {
        UncategorizedPolicy::Public => Condition::any()
            .add(post::Column::CategoryId.is_null())
            .add(category::Column::IsPublished.eq(true)),
        UncategorizedPolicy::Hidden => Condition::all()
            .add(post::Column::CategoryId.is_not_null())
            .add(category::Column::IsPublished.eq(true)),
    };

    let live = Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(query.now))
        .add(category_gate);

    let visible = match query.viewer.user_id() {
        Some(viewer_id) => Condition::any()
            .add(post::Column::AuthorId.eq(viewer_id))
            .add(live),
        None => live,
    };

    let mut select = PostEntity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .filter(visible);

    if let Some(author_id) = query.author_id {
        select = select.filter(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(post::Column::CategoryId.eq(category_id));
    }

    select
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: Uuid,
    comment_count: i64,
}

impl PostgresPostRepository {
    /// Attach authors, categories, locations and comment counts, one query
    /// per relation.
    async fn load_views(&self, posts: Vec<post::Model>) -> Result<Vec<PostView>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        let category_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.category_id).collect();
        let location_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.location_id).collect();

        let authors: HashMap<Uuid, Author> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    Author {
                        id: u.id,
                        username: u.username,
                    },
                )
            })
            .collect();

        let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(query_err)?
                .into_iter()
                .map(|c| (c.id, c.into()))
                .collect()
        };

        let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(query_err)?
                .into_iter()
                .map(|l| (l.id, l.into()))
                .collect()
        };

        let counts: HashMap<Uuid, u64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(
                Expr::col((CommentEntity, comment::Column::Id)).count(),
                "comment_count",
            )
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|c| (c.post_id, c.comment_count.max(0) as u64))
            .collect();

        posts
            .into_iter()
            .map(|model| {
                let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!(
                        "Author {} of post {} missing",
                        model.author_id, model.id
                    ))
                })?;
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = counts.get(&model.id).copied().unwrap_or(0);

                Ok(PostView {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn visible_posts(
        &self,
        policy: &VisibilityPolicy,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Paginated<PostView>, RepoError> {
        let select = visible_select(policy, query);

        let total = select.clone().count(&self.db).await.map_err(query_err)?;

        let posts = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        let views = self.load_views(posts).await?;
        Ok(Paginated::new(views, page, total))
    }

    async fn find_view(&self, id: Uuid) -> Result<Option<PostView>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        Ok(self.load_views(vec![model]).await?.pop())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(UserEntity)
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("Author of comment {} missing", comment.id))
                })?;
                Ok(CommentView {
                    comment: comment.into(),
                    author: Author {
                        id: author.id,
                        username: author.username,
                    },
                })
            })
            .collect()
    }
}
