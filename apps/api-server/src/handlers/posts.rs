//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::Viewer;
use quill_core::domain::{PageRequest, Post, User};
use quill_core::policy;
use quill_core::ports::{BaseRepository, PostFilter};
use quill_core::validation::{self, CONTENT_MAX, TITLE_MAX};
use quill_shared::ApiResponse;
use quill_shared::dto::{CreatePostRequest, PageQuery, PostListQuery, UpdatePostRequest};

use super::common::{
    find_author, load_account, load_actor, paginated, post_response, post_slug, resolve_viewer,
    visible_post,
};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn ensure_category_exists(state: &AppState, category_id: Uuid) -> AppResult<()> {
    match state.repos.categories.find_by_id(category_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(vec![format!(
            "category {category_id} does not exist"
        )])),
    }
}

/// Load a post for mutation: visible to the actor first, then owned.
async fn owned_post(state: &AppState, actor: &User, post_id: Uuid) -> AppResult<Post> {
    let viewer = Viewer::from_account(actor);
    let (post, _) = visible_post(state, viewer.as_ref(), post_id).await?;

    policy::can_modify_post(actor, &post)?;
    Ok(post)
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let mut filter = PostFilter {
        page: PageRequest::new(query.page, query.per_page),
        ..PostFilter::default()
    };

    if let Some(slug) = query.category.as_deref() {
        let category = state
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))?;
        filter.category_id = Some(category.id);
    }

    if let Some(username) = query.author.as_deref() {
        let author = state
            .repos
            .users
            .find_by_username(username)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| AppError::not_found("User"))?;
        filter.author_id = Some(author.id);
    }

    let page = state.repos.posts.list(&filter).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(paginated(page, post_response))))
}

/// GET /api/posts/mine - the caller's posts, drafts included
pub async fn mine(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let user = load_account(&state, &identity).await?;

    let filter = PostFilter {
        author_id: Some(user.id),
        include_drafts: true,
        page: PageRequest::new(query.page, query.per_page),
        ..PostFilter::default()
    };
    let page = state.repos.posts.list(&filter).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(paginated(page, post_response))))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let viewer = resolve_viewer(&state, identity.0).await?;
    let (post, author) = visible_post(&state, viewer.as_ref(), path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, &author))))
}

/// GET /api/posts/slug/{slug}
pub async fn get_by_slug(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let viewer = resolve_viewer(&state, identity.0).await?;

    let post = state
        .repos
        .posts
        .find_by_slug(&path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;
    let author = find_author(&state, post.user_id).await?;

    policy::can_view_post(viewer.as_ref(), &post, &author)
        .map_err(|_| AppError::not_found("Post"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, &author))))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let author = load_actor(&state, &identity).await?;
    let req = body.into_inner();

    let title = req.title.trim().to_string();
    validation::required_text("Title", &title, TITLE_MAX)?;
    validation::required_text("Content", &req.content, CONTENT_MAX)?;
    if let Some(category_id) = req.category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let slug = post_slug(&state, &title, None).await?;
    let post = Post::new(
        author.id,
        req.category_id,
        title,
        slug,
        req.content,
        req.is_published,
    );
    let post = state.repos.posts.create(post).await?;

    tracing::info!(post_id = %post.id, slug = %post.slug, author_id = %author.id, "Post created");

    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(post, &author))))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let mut post = owned_post(&state, &actor, path.into_inner()).await?;
    let req = body.into_inner();

    if let Some(title) = req.title.map(|t| t.trim().to_string()) {
        validation::required_text("Title", &title, TITLE_MAX)?;
        if title != post.title {
            post.slug = post_slug(&state, &title, Some(post.slug.as_str())).await?;
            post.title = title;
        }
    }

    if let Some(content) = req.content {
        validation::required_text("Content", &content, CONTENT_MAX)?;
        post.content = content;
    }

    if req.clear_category {
        post.category_id = None;
    } else if let Some(category_id) = req.category_id {
        ensure_category_exists(&state, category_id).await?;
        post.category_id = Some(category_id);
    }

    if let Some(published) = req.is_published {
        post.set_published(published);
    }

    post.touch();
    let post = state.repos.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post, &actor))))
}

/// DELETE /api/posts/{id} - comments and likes go with it
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let actor = load_actor(&state, &identity).await?;
    let post = owned_post(&state, &actor, path.into_inner()).await?;

    state.repos.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted")))
}
