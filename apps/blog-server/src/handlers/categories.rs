//! Public category pages.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::policy::PostQuery;
use blog_shared::dto::{CategoryPostsResponse, PageQuery};

use super::{page_number, present};
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /category/{slug}/ - a published category and its visible posts.
pub async fn category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("Category {slug} not found")))?;

    let page = state.page(page_number(&query)?)?;
    let scope = PostQuery::new(identity.viewer(), Utc::now()).in_category(category.id);

    let posts = state
        .posts
        .visible_posts(&state.visibility, &scope, page)
        .await?
        .ensure_exists()?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: present::category(category),
        posts: present::page(posts, present::post),
    }))
}
