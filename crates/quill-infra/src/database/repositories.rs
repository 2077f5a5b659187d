//! Bundles one implementation of every repository port.

use std::sync::Arc;

use quill_core::ports::{
    CategoryRepository, CommentRepository, LikeRepository, PostRepository, UserRepository,
};

use super::memory::InMemoryStore;

#[cfg(feature = "postgres")]
use sea_orm::DbConn;

#[cfg(feature = "postgres")]
use super::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLikeRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Repository handles shared by request handlers.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub categories: Arc<dyn CategoryRepository>,
}

impl Repositories {
    /// All repositories backed by one in-memory store.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }

    pub fn from_store(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            categories: store,
        }
    }

    /// All repositories sharing one PostgreSQL pool.
    // Excluded from unit-test builds: the sea-orm `mock` dev-dependency feature
    // removes `Clone` from `DatabaseConnection`.
    #[cfg(all(feature = "postgres", not(test)))]
    pub fn postgres(db: DbConn) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            likes: Arc::new(PostgresLikeRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db)),
        }
    }
}
