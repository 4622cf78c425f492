//! Comments on posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::{Author, Comment, CommentView};
use blog_core::policy::Action;
use blog_core::ports::BaseRepository;
use blog_shared::dto::CommentRequest;
use validator::Validate;

use super::posts::find_post;
use super::{ensure_author, present};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /posts/{post_id}/comment/
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    find_post(&state, post_id).await?;

    let req = body.into_inner();
    req.validate()?;

    let comment = state
        .comments
        .create(Comment::new(post_id, identity.user_id, req.text))
        .await?;
    tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment added");

    let view = with_author(&state, comment).await?;
    Ok(HttpResponse::Created().json(present::comment(view)))
}

/// POST /posts/{post_id}/edit_comment/{comment_id}/
pub async fn edit_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = find_comment(&state, post_id, comment_id).await?;
    ensure_author(&identity, &comment, Action::Update)?;

    let req = body.into_inner();
    req.validate()?;

    comment.text = req.text;
    let comment = state.comments.update(comment).await?;
    tracing::info!(comment_id = %comment_id, "Comment updated");

    let view = with_author(&state, comment).await?;
    Ok(HttpResponse::Ok().json(present::comment(view)))
}

/// POST /posts/{post_id}/delete_comment/{comment_id}/
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = find_comment(&state, post_id, comment_id).await?;
    ensure_author(&identity, &comment, Action::Delete)?;

    state.comments.delete(comment_id).await?;
    tracing::info!(comment_id = %comment_id, "Comment deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// The comment, provided it hangs under the post in the path.
async fn find_comment(state: &AppState, post_id: Uuid, comment_id: Uuid) -> AppResult<Comment> {
    state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| AppError::NotFound(format!("Comment {comment_id} not found")))
}

async fn with_author(state: &AppState, comment: Comment) -> AppResult<CommentView> {
    let author = state
        .users
        .find_by_id(comment.author_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(CommentView {
        comment,
        author: Author::from(&author),
    })
}
