//! Authentication handlers.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blog_core::domain::User;
use blog_core::ports::BaseRepository;
use blog_shared::dto::{AuthResponse, LoginRequest, PasswordChangeRequest, RegisterUserRequest};

use super::{form_errors, present};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /auth/registration/
///
/// Public sign-up never grants staff rights; see `blog-server create-staff`.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut form = form_errors(&req);
    if !form.has("username") && state.users.find_by_username(&req.username).await?.is_some() {
        form.add("username", "A user with that username already exists.");
    }
    if !form.has("email") && state.users.find_by_email(&req.email).await?.is_some() {
        form.add("email", "A user with that email already exists.");
    }
    form.finish()?;

    let password_hash = state.passwords.hash(&req.password)?;

    let mut user = User::new(req.username, req.email, password_hash);
    user.first_name = req.first_name;
    user.last_name = req.last_name;

    let user = state.users.create(user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(token_for(&state, &user)?))
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let Some(user) = state.users.find_by_username(&req.username).await? else {
        tracing::info!(username = %req.username, "Login for unknown user");
        return Err(AppError::Unauthorized);
    };

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login with wrong password");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(token_for(&state, &user)?))
}

/// POST /auth/password_change/
pub async fn password_change(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PasswordChangeRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let mut form = form_errors(&req);
    if !state.passwords.verify(&req.old_password, &user.password_hash)? {
        form.add(
            "old_password",
            "Your old password was entered incorrectly. Please enter it again.",
        );
    }
    form.finish()?;

    user.password_hash = state.passwords.hash(&req.new_password)?;
    user.updated_at = Utc::now();
    let user = state.users.update(user).await?;
    tracing::info!(user_id = %user.id, "Password changed");

    Ok(HttpResponse::Ok().json(token_for(&state, &user)?))
}

/// GET /auth/me/ - the caller's own account.
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(present::user(user)))
}

fn token_for(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let access_token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}
