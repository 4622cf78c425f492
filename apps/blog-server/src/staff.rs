//! Staff accounts are granted by the operator from the command line, never
//! through the public API.

use chrono::Utc;

use blog_core::domain::User;
use blog_core::ports::BaseRepository;
use blog_core::validation::FormErrors;
use blog_shared::dto::RegisterUserRequest;

use crate::handlers::form_errors;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Arguments of `blog-server create-staff`.
#[derive(Debug, Clone)]
pub struct StaffAccount {
    pub username: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Promote an existing account, or create a new one with staff rights.
/// A new account needs an email and a password that pass the sign-up rules.
pub async fn grant_staff(state: &AppState, account: StaffAccount) -> AppResult<User> {
    if let Some(mut user) = state.users.find_by_username(&account.username).await? {
        if user.is_staff {
            tracing::info!(user_id = %user.id, "Account already has staff rights");
            return Ok(user);
        }

        user.is_staff = true;
        user.updated_at = Utc::now();
        let user = state.users.update(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Staff rights granted");
        return Ok(user);
    }

    let mut form = FormErrors::new();
    if account.email.is_none() {
        form.add("email", "Required to create a new account.");
    }
    if account.password.is_none() {
        form.add("password", "Required to create a new account.");
    }
    form.finish()?;

    let req = RegisterUserRequest {
        username: account.username,
        email: account.email.unwrap_or_default(),
        password: account.password.unwrap_or_default(),
        first_name: String::new(),
        last_name: String::new(),
    };

    let mut form = form_errors(&req);
    if !form.has("email") && state.users.find_by_email(&req.email).await?.is_some() {
        form.add("email", "A user with that email already exists.");
    }
    form.finish()?;

    let password_hash = state.passwords.hash(&req.password)?;
    let mut user = User::new(req.username, req.email, password_hash);
    user.is_staff = true;

    let user = state.users.create(user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "Staff account created");

    Ok(user)
}
