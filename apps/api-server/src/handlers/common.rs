//! Helpers shared by the entity handlers: loading the caller, resolving
//! visibility, slug allocation and domain-to-DTO mapping.

use std::collections::HashSet;

use uuid::Uuid;

use quill_core::Viewer;
use quill_core::domain::{Authored, Category, Comment, Page, Post, User, UserDetails};
use quill_core::policy;
use quill_core::ports::BaseRepository;
use quill_core::slug::{slugify, unique_slug};
use quill_shared::Paginated;
use quill_shared::dto::{
    AuthorSummary, CategoryResponse, CommentResponse, PostResponse, UserDetailsDto, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub(crate) const POST_SLUG_FALLBACK: &str = "post";
pub(crate) const CATEGORY_SLUG_FALLBACK: &str = "category";

/// Reload the caller's account. Soft-deleted accounts no longer authenticate.
pub(crate) async fn load_account(state: &AppState, identity: &Identity) -> AppResult<User> {
    let user = state
        .repos
        .users
        .find_by_id(identity.user_id)
        .await?
        .filter(|user| user.deleted_at.is_none())
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    if user.role != identity.role {
        tracing::debug!(
            user_id = %user.id,
            username = %identity.username,
            token_role = %identity.role,
            account_role = %user.role,
            "Token role is stale; using the stored role"
        );
    }

    Ok(user)
}

/// Reload the caller's account and require it to be allowed to write.
pub(crate) async fn load_actor(state: &AppState, identity: &Identity) -> AppResult<User> {
    let user = load_account(state, identity).await?;
    policy::ensure_can_act(&user)?;
    Ok(user)
}

/// Resolve the reader of a public route. Inactive accounts read anonymously.
pub(crate) async fn resolve_viewer(
    state: &AppState,
    identity: Option<Identity>,
) -> AppResult<Option<Viewer>> {
    let Some(identity) = identity else {
        return Ok(None);
    };

    let account = state.repos.users.find_by_id(identity.user_id).await?;
    Ok(account.as_ref().and_then(Viewer::from_account))
}

pub(crate) async fn find_post(state: &AppState, id: Uuid) -> AppResult<Post> {
    state
        .repos
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Post"))
}

/// Author of some content. A dangling author reference reads as missing content.
pub(crate) async fn find_author(state: &AppState, user_id: Uuid) -> AppResult<User> {
    state
        .repos
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Resource"))
}

/// Load a post together with its author, applying read visibility.
pub(crate) async fn visible_post(
    state: &AppState,
    viewer: Option<&Viewer>,
    post_id: Uuid,
) -> AppResult<(Post, User)> {
    let post = find_post(state, post_id).await?;
    let author = find_author(state, post.user_id).await?;

    policy::can_view_post(viewer, &post, &author).map_err(|_| AppError::not_found("Post"))?;

    Ok((post, author))
}

fn base_slug(text: &str, fallback: &str) -> String {
    match slugify(text) {
        base if base.is_empty() => slugify(fallback),
        base => base,
    }
}

fn taken_set(slugs: Vec<String>, current: Option<&str>) -> HashSet<String> {
    let mut taken: HashSet<String> = slugs.into_iter().collect();
    if let Some(current) = current {
        taken.remove(current);
    }
    taken
}

/// Allocate a post slug for `title`. `current` is the slug being replaced,
/// which the post may keep.
pub(crate) async fn post_slug(
    state: &AppState,
    title: &str,
    current: Option<&str>,
) -> AppResult<String> {
    let base = base_slug(title, POST_SLUG_FALLBACK);
    let existing = state.repos.posts.slugs_with_prefix(&base).await?;

    Ok(unique_slug(
        title,
        POST_SLUG_FALLBACK,
        &taken_set(existing, current),
    ))
}

pub(crate) async fn category_slug(
    state: &AppState,
    name: &str,
    current: Option<&str>,
) -> AppResult<String> {
    let base = base_slug(name, CATEGORY_SLUG_FALLBACK);
    let existing = state.repos.categories.slugs_with_prefix(&base).await?;

    Ok(unique_slug(
        name,
        CATEGORY_SLUG_FALLBACK,
        &taken_set(existing, current),
    ))
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role.to_string(),
        status: user.status.to_string(),
        created_at: user.created_at,
    }
}

pub(crate) fn details_dto(details: UserDetails) -> UserDetailsDto {
    UserDetailsDto {
        display_name: details.display_name,
        bio: details.bio,
        avatar_url: details.avatar_url,
        website: details.website,
        location: details.location,
    }
}

pub(crate) fn author_summary(user: &User) -> AuthorSummary {
    AuthorSummary {
        id: user.id,
        username: user.username.clone(),
    }
}

pub(crate) fn post_response(post: Post, author: &User) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        is_published: post.is_published,
        published_at: post.published_at,
        category_id: post.category_id,
        author: author_summary(author),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub(crate) fn comment_response(comment: Comment, author: &User) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        content: comment.content,
        author: author_summary(author),
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub(crate) fn category_response(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        name: category.name,
        slug: category.slug,
        description: category.description,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub(crate) fn paginated<T, U>(
    page: Page<Authored<T>>,
    map: impl Fn(T, &User) -> U,
) -> Paginated<U> {
    let page = page.map(|Authored { item, author }| map(item, &author));

    Paginated {
        items: page.items,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    }
}

/// Trim optional free text, treating blank as absent.
pub(crate) fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
