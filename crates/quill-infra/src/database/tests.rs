#[cfg(test)]
mod tests {
    use crate::database::entity::{category, post, user};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresLikeRepository, PostgresPostRepository,
        PostgresUserRepository,
    };
    use quill_core::domain::{Category, Post, Role, User, UserStatus};
    use quill_core::error::RepoError;
    use quill_core::ports::{
        BaseRepository, CategoryRepository, LikeRepository, PostRepository, UserRepository,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn post_model(id: uuid::Uuid, slug: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            user_id: uuid::Uuid::new_v4(),
            category_id: None,
            title: "Test Post".to_owned(),
            slug: slug.to_owned(),
            content: "Content".to_owned(),
            is_published: true,
            published_at: Some(now.into()),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn user_model(role: &str, status: &str) -> user::Model {
        let now = chrono::Utc::now();
        user::Model {
            id: uuid::Uuid::new_v4(),
            username: "ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            role: role.to_owned(),
            status: status.to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, "test-post")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert!(post.is_published);
    }

    #[tokio::test]
    async fn test_find_post_by_slug_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        assert!(repo.find_by_slug("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_role_and_status_are_mapped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model("admin", "suspended")]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user: User = repo.find_by_username("ada").await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.status, UserStatus::Suspended);
        assert!(!user.is_active());
    }

    #[tokio::test]
    async fn test_unknown_status_is_treated_as_inactive() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user_model("superuser", "banned")]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.is_active());
    }

    #[tokio::test]
    async fn test_create_category_returns_inserted_row() {
        let now = chrono::Utc::now();
        let category = Category::new("Rust".to_owned(), "rust".to_owned(), None);
        let model = category::Model {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let saved: Category = repo.create(category.clone()).await.unwrap();
        assert_eq!(saved.id, category.id);
        assert_eq!(saved.slug, "rust");
    }

    #[tokio::test]
    async fn test_list_categories() {
        let now = chrono::Utc::now();
        let rows = ["Go", "Rust"].map(|name| category::Model {
            id: uuid::Uuid::new_v4(),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            description: None,
            created_at: now.into(),
            updated_at: now.into(),
        });

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![rows.to_vec()])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let categories = CategoryRepository::list(&repo).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].slug, "rust");
    }

    #[tokio::test]
    async fn test_unlike_without_like_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresLikeRepository::new(db);

        let result = repo.remove(uuid::Uuid::new_v4(), uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_missing_post_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = BaseRepository::<Post, uuid::Uuid>::delete(&repo, uuid::Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
