//! Like handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::Viewer;
use quill_core::domain::Like;
use quill_core::error::RepoError;
use quill_shared::ApiResponse;
use quill_shared::dto::LikeSummary;

use super::common::{load_actor, resolve_viewer, visible_post};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn like_summary(
    state: &AppState,
    post_id: Uuid,
    viewer: Option<&Viewer>,
) -> AppResult<LikeSummary> {
    let count = state.repos.likes.count_for_post(post_id).await?;
    let liked = match viewer {
        Some(viewer) => state.repos.likes.exists(viewer.id, post_id).await?,
        None => false,
    };

    Ok(LikeSummary {
        post_id,
        count,
        liked,
    })
}

/// GET /api/likes/post/{post_id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let viewer = resolve_viewer(&state, identity.0).await?;
    let (post, _) = visible_post(&state, viewer.as_ref(), path.into_inner()).await?;

    let summary = like_summary(&state, post.id, viewer.as_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}

/// POST /api/likes/post/{post_id}
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let viewer = Viewer::from_account(&actor);
    let (post, _) = visible_post(&state, viewer.as_ref(), path.into_inner()).await?;

    let already_liked = || AppError::Conflict("Post already liked".to_string());

    if state.repos.likes.exists(actor.id, post.id).await? {
        return Err(already_liked());
    }
    match state.repos.likes.insert(Like::new(actor.id, post.id)).await {
        Ok(_) => {}
        Err(RepoError::Constraint(_)) => return Err(already_liked()),
        Err(e) => return Err(e.into()),
    }

    let summary = like_summary(&state, post.id, viewer.as_ref()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(summary)))
}

/// DELETE /api/likes/post/{post_id}
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let viewer = Viewer::from_account(&actor);
    let (post, _) = visible_post(&state, viewer.as_ref(), path.into_inner()).await?;

    match state.repos.likes.remove(actor.id, post.id).await {
        Ok(()) => {}
        Err(RepoError::NotFound) => return Err(AppError::not_found("Like")),
        Err(e) => return Err(e.into()),
    }

    let summary = like_summary(&state, post.id, viewer.as_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}
