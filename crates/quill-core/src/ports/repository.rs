use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Authored, Category, Comment, Like, Page, PageRequest, Post, User, UserDetails,
};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique violations surface as `RepoError::Constraint`.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_details(&self, user_id: Uuid) -> Result<Option<UserDetails>, RepoError>;

    /// Insert or replace the profile row for `details.user_id`.
    async fn save_details(&self, details: UserDetails) -> Result<UserDetails, RepoError>;
}

/// Filter for post listings. Authors must always be active.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Include drafts. Only set when listing the caller's own posts.
    pub include_drafts: bool,
    pub page: PageRequest,
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Newest first, restricted to posts whose author is active.
    async fn list(&self, filter: &PostFilter) -> Result<Page<Authored<Post>>, RepoError>;

    /// All post slugs beginning with `prefix`.
    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Oldest first, restricted to comments whose author is active.
    async fn list_for_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Authored<Comment>>, RepoError>;
}

/// Like repository. Likes are keyed by `(user_id, post_id)`.
#[async_trait]
pub trait LikeRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    /// Fails with `RepoError::Constraint` when the pair already exists.
    async fn insert(&self, like: Like) -> Result<Like, RepoError>;

    /// Fails with `RepoError::NotFound` when the pair does not exist.
    async fn remove(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError>;

    /// Likes on a post from active accounts.
    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError>;

    /// Ordered by name.
    async fn list(&self) -> Result<Vec<Category>, RepoError>;

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError>;
}
