//! Data Transfer Objects - request/response types for the API.
//!
//! Request bodies carry their own field rules through `validator`. Checks
//! that need storage (uniqueness, referenced rows) stay in the handlers.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Empty values pass the patterns; `not_blank` reports them.
static USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w.@+-]*$").unwrap());
static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]*$").unwrap());

fn default_true() -> bool {
    true
}

fn rejected(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rejected("required", "This field is required."));
    }
    Ok(())
}

fn not_numeric(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        return Err(rejected("numeric", "This password is entirely numeric."));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Auth & profile
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "Ensure this value has at most 150 characters."),
        regex(
            path = *USERNAME,
            message = "Enter a valid username. This value may contain only letters, \
                       numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 254, message = "Ensure this value has at most 254 characters."),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(
        length(
            min = 8,
            message = "This password is too short. It must contain at least 8 characters."
        ),
        custom(function = "not_numeric")
    )]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// The old password is checked against the stored hash by the handler.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordChangeRequest {
    pub old_password: String,
    #[validate(
        length(
            min = 8,
            message = "This password is too short. It must contain at least 8 characters."
        ),
        custom(function = "not_numeric")
    )]
    pub new_password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// The caller's own account, including private fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user on their profile page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: PublicProfile,
    pub posts: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 150, message = "Ensure this value has at most 150 characters."),
        regex(
            path = *USERNAME,
            message = "Enter a valid username. This value may contain only letters, \
                       numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 254, message = "Ensure this value has at most 254 characters."),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
}

// ---------------------------------------------------------------------------
// Posts & comments
// ---------------------------------------------------------------------------

/// `?page=N` query string of paginated listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Create or edit a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 256, message = "Ensure this value has at most 256 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub text: String,
    /// A future date schedules the post.
    pub pub_date: DateTime<Utc>,
    /// Stored in a 1024-character column.
    #[serde(default)]
    #[validate(length(max = 1024, message = "Ensure this value has at most 1024 characters."))]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
    pub category: Option<CategoryResponse>,
    pub location: Option<LocationResponse>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(custom(function = "not_blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
}

// ---------------------------------------------------------------------------
// Categories & locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CategoryRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 256, message = "Ensure this value has at most 256 characters.")
    )]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(
        custom(function = "not_blank"),
        length(max = 64, message = "Ensure this value has at most 64 characters."),
        regex(
            path = *SLUG,
            message = "Enter a valid slug consisting of letters, numbers, underscores or hyphens."
        )
    )]
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPostsResponse {
    pub category: CategoryResponse,
    pub posts: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(
        custom(function = "not_blank"),
        length(max = 256, message = "Ensure this value has at most 256 characters.")
    )]
    pub name: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}
