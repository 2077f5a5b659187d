use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Post entity - represents a blog post or article.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post. `slug` must already be unique.
    pub fn new(
        user_id: Uuid,
        category_id: Option<Uuid>,
        title: String,
        slug: String,
        content: String,
        is_published: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            category_id,
            title,
            slug,
            content,
            is_published,
            published_at: is_published.then_some(now),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Toggle publication. The first publish stamps `published_at`; it is kept
    /// on unpublish so a later republish preserves the original date.
    pub fn set_published(&mut self, published: bool) {
        if published && self.published_at.is_none() {
            self.published_at = Some(Utc::now());
        }
        self.is_published = published;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> Post {
        Post::new(
            Uuid::new_v4(),
            None,
            "Title".into(),
            "title".into(),
            "Body".into(),
            false,
        )
    }

    #[test]
    fn test_new_draft_has_no_publish_date() {
        let post = draft();
        assert!(!post.is_published);
        assert!(post.published_at.is_none());
    }

    #[test]
    fn test_publish_stamps_once() {
        let mut post = draft();
        post.set_published(true);
        let first = post.published_at.unwrap();

        post.set_published(false);
        post.set_published(true);
        assert_eq!(post.published_at, Some(first));
    }
}
