//! User profiles.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::policy::PostQuery;
use blog_core::ports::BaseRepository;
use blog_shared::dto::{PageQuery, ProfileResponse, ProfileUpdateRequest};

use super::{form_errors, page_number, present};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /profile/{username}/
///
/// The owner sees every one of their posts; everyone else sees the live ones.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {username} not found")))?;

    let page = state.page(page_number(&query)?)?;
    let scope = PostQuery::new(identity.viewer(), Utc::now()).by_author(user.id);

    let posts = state
        .posts
        .visible_posts(&state.visibility, &scope, page)
        .await?
        .ensure_exists()?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: present::profile(user),
        posts: present::page(posts, present::post),
    }))
}

/// POST /edit/profile/
pub async fn edit_profile(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let mut form = form_errors(&req);
    if !form.has("username")
        && req.username != user.username
        && state.users.find_by_username(&req.username).await?.is_some()
    {
        form.add("username", "A user with that username already exists.");
    }
    if !form.has("email")
        && req.email != user.email
        && state.users.find_by_email(&req.email).await?.is_some()
    {
        form.add("email", "A user with that email already exists.");
    }
    form.finish()?;

    user.username = req.username;
    user.first_name = req.first_name;
    user.last_name = req.last_name;
    user.email = req.email;
    user.updated_at = Utc::now();

    let user = state.users.update(user).await?;
    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(HttpResponse::Ok().json(present::user(user)))
}
