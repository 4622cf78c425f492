//! Staff management of categories and locations.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blog_core::domain::{Category, Location};
use blog_core::ports::BaseRepository;
use blog_shared::dto::{CategoryRequest, LocationRequest};
use validator::Validate;

use super::{form_errors, present};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Staff rights are read from the account, not the token, so revocation is immediate.
async fn require_staff(state: &AppState, identity: &Identity) -> AppResult<()> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if user.is_staff {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, "Non-staff user tried to manage taxonomy");
        Err(AppError::Forbidden)
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /manage/categories/ - all categories, unpublished included.
pub async fn list_categories(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(
        categories
            .into_iter()
            .map(present::category)
            .collect::<Vec<_>>(),
    ))
}

/// POST /manage/categories/
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let req = body.into_inner();
    validate_category(&state, &req, None).await?;

    let mut category = Category::new(req.title, req.description, req.slug);
    category.is_published = req.is_published;

    let category = state.categories.create(category).await?;
    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(present::category(category)))
}

/// POST /manage/categories/{id}/edit/
pub async fn edit_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let id = path.into_inner();
    let mut category = state
        .categories
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {id} not found")))?;

    let req = body.into_inner();
    validate_category(&state, &req, Some(id)).await?;

    category.title = req.title;
    category.description = req.description;
    category.slug = req.slug;
    category.is_published = req.is_published;

    let category = state.categories.update(category).await?;
    tracing::info!(category_id = %id, is_published = category.is_published, "Category updated");

    Ok(HttpResponse::Ok().json(present::category(category)))
}

/// POST /manage/categories/{id}/delete/ - its posts stay, uncategorized.
pub async fn delete_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let id = path.into_inner();
    state.categories.delete(id).await?;
    tracing::info!(category_id = %id, "Category deleted");

    Ok(HttpResponse::NoContent().finish())
}

async fn validate_category(
    state: &AppState,
    req: &CategoryRequest,
    current: Option<Uuid>,
) -> AppResult<()> {
    let mut form = form_errors(req);
    if !form.has("slug")
        && let Some(existing) = state.categories.find_by_slug(&req.slug).await?
        && Some(existing.id) != current
    {
        form.add("slug", "Category with this slug already exists.");
    }

    form.finish().map_err(AppError::from)
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// GET /manage/locations/
pub async fn list_locations(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let locations = state.locations.list().await?;
    Ok(HttpResponse::Ok().json(
        locations
            .into_iter()
            .map(present::location)
            .collect::<Vec<_>>(),
    ))
}

/// POST /manage/locations/
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let req = body.into_inner();
    req.validate()?;

    let mut location = Location::new(req.name);
    location.is_published = req.is_published;

    let location = state.locations.create(location).await?;
    tracing::info!(location_id = %location.id, "Location created");

    Ok(HttpResponse::Created().json(present::location(location)))
}

/// POST /manage/locations/{id}/edit/
pub async fn edit_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let id = path.into_inner();
    let mut location = state
        .locations
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {id} not found")))?;

    let req = body.into_inner();
    req.validate()?;

    location.name = req.name;
    location.is_published = req.is_published;

    let location = state.locations.update(location).await?;
    tracing::info!(location_id = %id, "Location updated");

    Ok(HttpResponse::Ok().json(present::location(location)))
}

/// POST /manage/locations/{id}/delete/
pub async fn delete_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    require_staff(&state, &identity).await?;

    let id = path.into_inner();
    state.locations.delete(id).await?;
    tracing::info!(location_id = %id, "Location deleted");

    Ok(HttpResponse::NoContent().finish())
}
