//! Post listing, detail and authoring.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blog_core::domain::Post;
use blog_core::policy::{Action, PostQuery};
use blog_core::ports::BaseRepository;
use blog_shared::dto::{PageQuery, PostDetailResponse, PostRequest};

use super::{ensure_author, form_errors, page_number, present};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET / - visible posts, newest first.
pub async fn index(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.page(page_number(&query)?)?;
    let scope = PostQuery::new(identity.viewer(), Utc::now());

    let posts = state
        .posts
        .visible_posts(&state.visibility, &scope, page)
        .await?
        .ensure_exists()?;

    Ok(HttpResponse::Ok().json(present::page(posts, present::post)))
}

/// GET /posts/{post_id}/
///
/// Hidden posts answer 404 rather than 403, so their existence is not leaked.
pub async fn post_detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let viewer = identity.viewer();

    let view = state
        .posts
        .find_view(post_id)
        .await?
        .filter(|v| {
            state
                .visibility
                .is_visible(&v.post, v.category.as_ref(), &viewer, Utc::now())
        })
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

    let comments = state.comments.list_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: present::post(view),
        comments: comments.into_iter().map(present::comment).collect(),
    }))
}

/// POST /posts/create/
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    validate_post(&state, &req).await?;

    let mut post = Post::new(identity.user_id, req.title, req.text, req.pub_date)
        .with_category(req.category_id)
        .with_location(req.location_id);
    post.image = req.image;
    post.is_published = req.is_published;

    let post = state.posts.create(post).await?;
    tracing::info!(post_id = %post.id, author = %identity.username, "Post created");

    let view = state
        .posts
        .find_view(post.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Post {} vanished after insert", post.id)))?;

    Ok(HttpResponse::Created()
        .insert_header(("Location", format!("/posts/{}/", post.id)))
        .json(present::post(view)))
}

/// POST /posts/{post_id}/edit/
pub async fn edit_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let mut post = find_post(&state, post_id).await?;
    ensure_author(&identity, &post, Action::Update)?;

    let req = body.into_inner();
    validate_post(&state, &req).await?;

    post.title = req.title;
    post.text = req.text;
    post.pub_date = req.pub_date;
    post.image = req.image;
    post.is_published = req.is_published;
    post.category_id = req.category_id;
    post.location_id = req.location_id;
    post.updated_at = Utc::now();

    state.posts.update(post).await?;
    tracing::info!(post_id = %post_id, "Post updated");

    let view = state
        .posts
        .find_view(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))?;

    Ok(HttpResponse::Ok().json(present::post(view)))
}

/// POST /posts/{post_id}/delete/ - comments go with the post.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = find_post(&state, post_id).await?;
    ensure_author(&identity, &post, Action::Delete)?;

    state.posts.delete(post_id).await?;
    tracing::info!(post_id = %post_id, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

pub(super) async fn find_post(state: &AppState, post_id: Uuid) -> AppResult<Post> {
    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Post {post_id} not found")))
}

async fn validate_post(state: &AppState, req: &PostRequest) -> AppResult<()> {
    let mut form = form_errors(req);

    if let Some(category_id) = req.category_id
        && state.categories.find_by_id(category_id).await?.is_none()
    {
        form.add(
            "category_id",
            "Select a valid choice. That choice is not one of the available choices.",
        );
    }

    if let Some(location_id) = req.location_id
        && state.locations.find_by_id(location_id).await?.is_none()
    {
        form.add(
            "location_id",
            "Select a valid choice. That choice is not one of the available choices.",
        );
    }

    form.finish().map_err(AppError::from)
}
