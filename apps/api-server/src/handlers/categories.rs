//! Category handlers. Reads are public; writes are admin-only.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Category;
use quill_core::policy;
use quill_core::ports::BaseRepository;
use quill_core::validation::{self, CATEGORY_NAME_MAX};
use quill_shared::ApiResponse;
use quill_shared::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use super::common::{category_response, category_slug, clean, load_actor};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn ensure_name_free(state: &AppState, name: &str, except: Option<Uuid>) -> AppResult<()> {
    match state.repos.categories.find_by_name(name).await? {
        Some(existing) if Some(existing.id) != except => Err(AppError::Conflict(format!(
            "Category '{name}' already exists"
        ))),
        _ => Ok(()),
    }
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories: Vec<CategoryResponse> = state
        .repos
        .categories
        .list()
        .await?
        .into_iter()
        .map(category_response)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// GET /api/categories/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let category = state
        .repos
        .categories
        .find_by_slug(&path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category_response(category))))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    policy::can_manage_categories(&actor)?;

    let req = body.into_inner();
    let name = req.name.trim().to_string();
    validation::required_text("Name", &name, CATEGORY_NAME_MAX)?;
    ensure_name_free(&state, &name, None).await?;

    let slug = category_slug(&state, &name, None).await?;
    let category = state
        .repos
        .categories
        .create(Category::new(name, slug, clean(req.description)))
        .await?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(category_response(category))))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    policy::can_manage_categories(&actor)?;

    let mut category = state
        .repos
        .categories
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    let req = body.into_inner();

    if let Some(name) = req.name.map(|n| n.trim().to_string()) {
        validation::required_text("Name", &name, CATEGORY_NAME_MAX)?;
        if name != category.name {
            ensure_name_free(&state, &name, Some(category.id)).await?;
            category.slug = category_slug(&state, &name, Some(category.slug.as_str())).await?;
            category.name = name;
        }
    }

    // An explicit empty description clears it.
    if req.description.is_some() {
        category.description = clean(req.description);
    }

    category.updated_at = chrono::Utc::now();
    let category = state.repos.categories.update(category).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(category_response(category))))
}

/// DELETE /api/categories/{id} - posts keep existing without a category
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    policy::can_manage_categories(&actor)?;

    let id = path.into_inner();
    state
        .repos
        .categories
        .delete(id)
        .await
        .map_err(|e| match e {
            quill_core::RepoError::NotFound => AppError::not_found("Category"),
            other => other.into(),
        })?;

    tracing::info!(category_id = %id, "Category deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Category deleted")))
}
