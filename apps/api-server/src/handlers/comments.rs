//! Comment handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::Viewer;
use quill_core::domain::{Comment, PageRequest, User};
use quill_core::policy;
use quill_core::ports::BaseRepository;
use quill_core::validation::{self, COMMENT_MAX};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreateCommentRequest, PageQuery, UpdateCommentRequest};

use super::common::{
    comment_response, find_author, find_post, load_actor, paginated, resolve_viewer, visible_post,
};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a comment with its author; both it and its post must be visible.
async fn visible_comment(
    state: &AppState,
    viewer: Option<&Viewer>,
    comment_id: Uuid,
) -> AppResult<(Comment, User)> {
    let comment = state
        .repos
        .comments
        .find_by_id(comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment"))?;

    let author = find_author(state, comment.user_id).await?;
    let post = find_post(state, comment.post_id).await?;
    let post_author = find_author(state, post.user_id).await?;

    policy::can_view_comment(viewer, &author, &post, &post_author)
        .map_err(|_| AppError::not_found("Comment"))?;

    Ok((comment, author))
}

async fn modifiable_comment(
    state: &AppState,
    actor: &User,
    comment_id: Uuid,
) -> AppResult<(Comment, User)> {
    let viewer = Viewer::from_account(actor);
    let (comment, author) = visible_comment(state, viewer.as_ref(), comment_id).await?;

    policy::can_modify_comment(actor, &comment)?;
    Ok((comment, author))
}

/// GET /api/comments/post/{post_id}
pub async fn list_for_post(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let viewer = resolve_viewer(&state, identity.0).await?;
    let (post, _) = visible_post(&state, viewer.as_ref(), path.into_inner()).await?;

    let page = state
        .repos
        .comments
        .list_for_post(post.id, PageRequest::new(query.page, query.per_page))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(paginated(page, comment_response))))
}

/// GET /api/comments/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let viewer = resolve_viewer(&state, identity.0).await?;
    let (comment, author) = visible_comment(&state, viewer.as_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment_response(comment, &author))))
}

/// POST /api/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let req = body.into_inner();

    validation::required_text("Content", &req.content, COMMENT_MAX)?;

    let viewer = Viewer::from_account(&actor);
    let (post, _) = visible_post(&state, viewer.as_ref(), req.post_id).await?;

    let comment = state
        .repos
        .comments
        .create(Comment::new(actor.id, post.id, req.content))
        .await?;

    tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(comment_response(comment, &actor))))
}

/// PUT /api/comments/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let (mut comment, author) = modifiable_comment(&state, &actor, path.into_inner()).await?;

    let content = body.into_inner().content;
    validation::required_text("Content", &content, COMMENT_MAX)?;

    comment.edit(content);
    let comment = state.repos.comments.update(comment).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(comment_response(comment, &author))))
}

/// DELETE /api/comments/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let (comment, _) = modifiable_comment(&state, &actor, path.into_inner()).await?;

    state.repos.comments.delete(comment.id).await?;

    tracing::info!(
        comment_id = %comment.id,
        deleted_by = %actor.id,
        moderated = !comment.is_owned_by(actor.id),
        "Comment deleted"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::message("Comment deleted")))
}
