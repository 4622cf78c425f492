//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod manage;
mod posts;
mod present;
mod profile;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub(crate) use tests::test_state;

use std::sync::Arc;

use actix_web::web;
use blog_core::policy::{Action, Authored, authorize};
use blog_core::ports::RateLimiter;
use blog_core::validation::FormErrors;
use blog_shared::dto::PageQuery;
use validator::Validate;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, field_errors};
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes. The `/auth` scope sits behind `limiter`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Arc<dyn RateLimiter>) {
    cfg.route("/", web::get().to(posts::index))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/posts")
                .route("/create/", web::post().to(posts::create_post))
                .route("/{post_id}/", web::get().to(posts::post_detail))
                .route("/{post_id}/edit/", web::post().to(posts::edit_post))
                .route("/{post_id}/delete/", web::post().to(posts::delete_post))
                .route("/{post_id}/comment/", web::post().to(comments::add_comment))
                .route(
                    "/{post_id}/edit_comment/{comment_id}/",
                    web::post().to(comments::edit_comment),
                )
                .route(
                    "/{post_id}/delete_comment/{comment_id}/",
                    web::post().to(comments::delete_comment),
                ),
        )
        .route("/category/{slug}/", web::get().to(categories::category_posts))
        .route("/profile/{username}/", web::get().to(profile::profile))
        .route("/edit/profile/", web::post().to(profile::edit_profile))
        .service(
            web::scope("/auth")
                .wrap(RateLimitMiddleware::new(limiter))
                .route("/registration/", web::post().to(auth::register))
                .route("/login/", web::post().to(auth::login))
                .route("/password_change/", web::post().to(auth::password_change))
                .route("/me/", web::get().to(auth::me)),
        )
        .service(
            web::scope("/manage")
                .route("/categories/", web::get().to(manage::list_categories))
                .route("/categories/", web::post().to(manage::create_category))
                .route("/categories/{id}/edit/", web::post().to(manage::edit_category))
                .route("/categories/{id}/delete/", web::post().to(manage::delete_category))
                .route("/locations/", web::get().to(manage::list_locations))
                .route("/locations/", web::post().to(manage::create_location))
                .route("/locations/{id}/edit/", web::post().to(manage::edit_location))
                .route("/locations/{id}/delete/", web::post().to(manage::delete_location)),
        );
}

/// Malformed JSON bodies get the same problem-details shape as other errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Path segments that do not parse (a malformed id) name no resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        tracing::debug!(path = %req.path(), error = %err, "Unparsable path segment");
        AppError::NotFound(format!("Nothing at {}", req.path())).into()
    })
}

/// Field-local problems of a request body; handlers add storage checks.
pub(crate) fn form_errors(req: &impl Validate) -> FormErrors {
    match req.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => FormErrors::from(field_errors(&errors)),
    }
}

/// 1-based page number of `?page=`; anything unparsable is a missing page.
fn page_number(query: &PageQuery) -> AppResult<u64> {
    match query.page.as_deref() {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| AppError::NotFound(format!("Invalid page ({raw})"))),
    }
}

/// Only the author may change or remove a post or comment.
fn ensure_author<R: Authored + ?Sized>(
    identity: &Identity,
    record: &R,
    action: Action,
) -> AppResult<()> {
    authorize(&identity.viewer(), record, action).map_err(|e| {
        tracing::warn!(
            user_id = %identity.user_id,
            author_id = %record.author_id(),
            ?action,
            "Rejected change to another user's content"
        );
        AppError::from(e)
    })
}
