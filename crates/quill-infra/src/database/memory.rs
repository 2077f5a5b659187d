//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Mirrors the constraints of the SQL schema: unique usernames, emails, post
//! slugs, category names and slugs, one like per (user, post), cascading
//! deletes from posts, and `SET NULL` on category removal.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{
    Authored, Category, Comment, Like, Page, PageRequest, Post, User, UserDetails,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LikeRepository, PostFilter,
    PostRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    details: HashMap<Uuid, UserDetails>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
    likes: HashMap<(Uuid, Uuid), Like>,
    categories: HashMap<Uuid, Category>,
}

impl Tables {
    fn active_author(&self, user_id: Uuid) -> Option<&User> {
        self.users.get(&user_id).filter(|u| u.is_active())
    }

    fn check_user_unique(&self, user: &User) -> Result<(), RepoError> {
        let clash = self.users.values().find(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        });
        match clash {
            Some(u) if u.username == user.username => {
                Err(RepoError::Constraint("users_username_key".to_string()))
            }
            Some(_) => Err(RepoError::Constraint("users_email_key".to_string())),
            None => Ok(()),
        }
    }

    fn check_post_unique(&self, post: &Post) -> Result<(), RepoError> {
        if self
            .posts
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug)
        {
            return Err(RepoError::Constraint("posts_slug_key".to_string()));
        }
        Ok(())
    }

    fn check_category_unique(&self, category: &Category) -> Result<(), RepoError> {
        for c in self.categories.values().filter(|c| c.id != category.id) {
            if c.name == category.name {
                return Err(RepoError::Constraint("categories_name_key".to_string()));
            }
            if c.slug == category.slug {
                return Err(RepoError::Constraint("categories_slug_key".to_string()));
            }
        }
        Ok(())
    }
}

fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let items = items
        .into_iter()
        .skip(usize::try_from(request.offset()).unwrap_or(usize::MAX))
        .take(request.per_page as usize)
        .collect();
    Page::new(items, request, total)
}

/// In-memory store implementing every repository port.
///
/// One store backs all repositories so that joins (author visibility) and
/// cascades behave like the relational schema.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(RepoError::Constraint("users_pkey".to_string()));
        }
        tables.check_user_unique(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_user_unique(&user)?;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;
        tables.details.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_details(&self, user_id: Uuid) -> Result<Option<UserDetails>, RepoError> {
        Ok(self.tables.read().await.details.get(&user_id).cloned())
    }

    async fn save_details(&self, details: UserDetails) -> Result<UserDetails, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&details.user_id) {
            return Err(RepoError::Constraint("user_details_user_id_fkey".to_string()));
        }
        tables.details.insert(details.user_id, details.clone());
        Ok(details)
    }
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn create(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_unique(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_post_unique(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.comments.retain(|_, c| c.post_id != id);
        tables.likes.retain(|(_, post_id), _| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list(&self, filter: &PostFilter) -> Result<Page<Authored<Post>>, RepoError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<Authored<Post>> = tables
            .posts
            .values()
            .filter(|p| filter.author_id.is_none_or(|id| p.user_id == id))
            .filter(|p| filter.category_id.is_none_or(|id| p.category_id == Some(id)))
            .filter(|p| filter.include_drafts || p.is_published)
            .filter_map(|p| {
                tables.active_author(p.user_id).map(|author| Authored {
                    item: p.clone(),
                    author: author.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.item.created_at.cmp(&a.item.created_at));

        Ok(paginate(rows, filter.page))
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.slug.starts_with(prefix))
            .map(|p| p.slug.clone())
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn create(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint("comments_post_id_fkey".to_string()));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.comments.get_mut(&comment.id) {
            Some(existing) => {
                *existing = comment.clone();
                Ok(comment)
            }
            None => Err(RepoError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Authored<Comment>>, RepoError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<Authored<Comment>> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .filter_map(|c| {
                tables.active_author(c.user_id).map(|author| Authored {
                    item: c.clone(),
                    author: author.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.item.created_at.cmp(&b.item.created_at));

        Ok(paginate(rows, page))
    }
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .likes
            .contains_key(&(user_id, post_id)))
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let mut tables = self.tables.write().await;
        let key = (like.user_id, like.post_id);
        if tables.likes.contains_key(&key) {
            return Err(RepoError::Constraint("likes_pkey".to_string()));
        }
        tables.likes.insert(key, like.clone());
        Ok(like)
    }

    async fn remove(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .likes
            .remove(&(user_id, post_id))
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .likes
            .keys()
            .filter(|(user_id, liked)| {
                *liked == post_id && tables.active_author(*user_id).is_some()
            })
            .count();
        Ok(count as u64)
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn create(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_category_unique(&category)?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        tables.check_category_unique(&category)?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .filter(|c| c.slug.starts_with(prefix))
            .map(|c| c.slug.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::UserStatus;

    fn user(name: &str) -> User {
        User::new(name.into(), format!("{name}@example.com"), "hash".into())
    }

    fn post(author: &User, slug: &str, published: bool) -> Post {
        Post::new(
            author.id,
            None,
            slug.into(),
            slug.into(),
            "body".into(),
            published,
        )
    }

    async fn seeded() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let ada = BaseRepository::<User, Uuid>::create(&store, user("ada"))
            .await
            .unwrap();
        (store, ada)
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint() {
        let (store, _) = seeded().await;
        let mut dup = user("ada");
        dup.email = "other@example.com".into();

        let result = BaseRepository::<User, Uuid>::create(&store, dup).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_listing_hides_inactive_authors_and_drafts() {
        let (store, mut ada) = seeded().await;
        let bob = BaseRepository::<User, Uuid>::create(&store, user("bob"))
            .await
            .unwrap();

        BaseRepository::<Post, Uuid>::create(&store, post(&ada, "ada-live", true))
            .await
            .unwrap();
        BaseRepository::<Post, Uuid>::create(&store, post(&ada, "ada-draft", false))
            .await
            .unwrap();
        BaseRepository::<Post, Uuid>::create(&store, post(&bob, "bob-live", true))
            .await
            .unwrap();

        let page = PostRepository::list(&store, &PostFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        ada.set_status(UserStatus::Suspended);
        BaseRepository::<User, Uuid>::update(&store, ada).await.unwrap();

        let page = PostRepository::list(&store, &PostFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].item.slug, "bob-live");
    }

    #[tokio::test]
    async fn test_comment_listing_skips_inactive_commenters() {
        let (store, ada) = seeded().await;
        let mut bob = BaseRepository::<User, Uuid>::create(&store, user("bob"))
            .await
            .unwrap();
        let p = BaseRepository::<Post, Uuid>::create(&store, post(&ada, "p", true))
            .await
            .unwrap();
        for author in [&ada, &bob] {
            BaseRepository::<Comment, Uuid>::create(
                &store,
                Comment::new(author.id, p.id, "hi".into()),
            )
            .await
            .unwrap();
        }

        let page = CommentRepository::list_for_post(&store, p.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);

        bob.soft_delete();
        BaseRepository::<User, Uuid>::update(&store, bob).await.unwrap();

        let page = CommentRepository::list_for_post(&store, p.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].author.id, ada.id);
    }

    #[tokio::test]
    async fn test_duplicate_like_and_missing_unlike() {
        let (store, ada) = seeded().await;
        let p = BaseRepository::<Post, Uuid>::create(&store, post(&ada, "p", true))
            .await
            .unwrap();

        store.insert(Like::new(ada.id, p.id)).await.unwrap();
        assert!(matches!(
            store.insert(Like::new(ada.id, p.id)).await,
            Err(RepoError::Constraint(_))
        ));
        assert_eq!(store.count_for_post(p.id).await.unwrap(), 1);

        store.remove(ada.id, p.id).await.unwrap();
        assert!(matches!(
            store.remove(ada.id, p.id).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_post_delete_cascades() {
        let (store, ada) = seeded().await;
        let p = BaseRepository::<Post, Uuid>::create(&store, post(&ada, "p", true))
            .await
            .unwrap();
        let c = BaseRepository::<Comment, Uuid>::create(
            &store,
            Comment::new(ada.id, p.id, "hi".into()),
        )
        .await
        .unwrap();
        store.insert(Like::new(ada.id, p.id)).await.unwrap();

        BaseRepository::<Post, Uuid>::delete(&store, p.id)
            .await
            .unwrap();

        let found = BaseRepository::<Comment, Uuid>::find_by_id(&store, c.id)
            .await
            .unwrap();
        assert!(found.is_none());
        assert!(!store.exists(ada.id, p.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_category_delete_clears_post_category() {
        let (store, ada) = seeded().await;
        let cat = BaseRepository::<Category, Uuid>::create(
            &store,
            Category::new("Rust".into(), "rust".into(), None),
        )
        .await
        .unwrap();
        let mut p = post(&ada, "p", true);
        p.category_id = Some(cat.id);
        let p = BaseRepository::<Post, Uuid>::create(&store, p).await.unwrap();

        BaseRepository::<Category, Uuid>::delete(&store, cat.id)
            .await
            .unwrap();

        let p = BaseRepository::<Post, Uuid>::find_by_id(&store, p.id)
            .await
            .unwrap()
            .unwrap();
        assert!(p.category_id.is_none());
    }
}
