//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use quill_core::domain::{
    Authored, Category, Comment, Like, Page, PageRequest, Post, User, UserDetails, UserStatus,
};
use quill_core::error::RepoError;
use quill_core::ports::{
    CategoryRepository, CommentRepository, LikeRepository, PostFilter, PostRepository,
    UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::like::{self, Entity as LikeEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::entity::user_details::{self, Entity as UserDetailsEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// Rows joined with `users` are only visible while the user is active and not
/// soft-deleted. Every listing that returns other people's content uses this.
pub(crate) fn active_author() -> Condition {
    Condition::all()
        .add(user::Column::Status.eq(UserStatus::Active.as_str()))
        .add(user::Column::DeletedAt.is_null())
}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

fn authored<M, A, T>(rows: Vec<(M, Option<A>)>) -> Vec<Authored<T>>
where
    T: From<M>,
    User: From<A>,
{
    rows.into_iter()
        .filter_map(|(item, author)| {
            author.map(|author| Authored {
                item: item.into(),
                author: author.into(),
            })
        })
        .collect()
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_details(&self, user_id: Uuid) -> Result<Option<UserDetails>, RepoError> {
        let result = UserDetailsEntity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save_details(&self, details: UserDetails) -> Result<UserDetails, RepoError> {
        let model: user_details::ActiveModel = details.into();

        let saved = UserDetailsEntity::insert(model)
            .on_conflict(
                OnConflict::column(user_details::Column::UserId)
                    .update_columns([
                        user_details::Column::DisplayName,
                        user_details::Column::Bio,
                        user_details::Column::AvatarUrl,
                        user_details::Column::Website,
                        user_details::Column::Location,
                        user_details::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(saved.into())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, filter: &PostFilter) -> Result<Page<Authored<Post>>, RepoError> {
        let mut query = PostEntity::find()
            .find_also_related(UserEntity)
            .filter(active_author());

        if let Some(author_id) = filter.author_id {
            query = query.filter(post::Column::UserId.eq(author_id));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(post::Column::CategoryId.eq(category_id));
        }
        if !filter.include_drafts {
            query = query.filter(post::Column::IsPublished.eq(true));
        }

        let paginator = query
            .order_by_desc(post::Column::CreatedAt)
            .paginate(&self.db, filter.page.per_page);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator
            .fetch_page(filter.page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(authored(rows), filter.page, total))
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError> {
        let slugs: Vec<String> = PostEntity::find()
            .select_only()
            .column(post::Column::Slug)
            .filter(post::Column::Slug.starts_with(prefix))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        // LIKE treats '_' as a wildcard; keep only true prefix matches.
        Ok(slugs.into_iter().filter(|s| s.starts_with(prefix)).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(
        &self,
        post_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Authored<Comment>>, RepoError> {
        let paginator = CommentEntity::find()
            .find_also_related(UserEntity)
            .filter(comment::Column::PostId.eq(post_id))
            .filter(active_author())
            .order_by_asc(comment::Column::CreatedAt)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(map_db_err)?;
        let rows = paginator
            .fetch_page(page.page - 1)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(authored(rows), page, total))
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> Result<Vec<String>, RepoError> {
        let slugs: Vec<String> = CategoryEntity::find()
            .select_only()
            .column(category::Column::Slug)
            .filter(category::Column::Slug.starts_with(prefix))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(slugs.into_iter().filter(|s| s.starts_with(prefix)).collect())
    }
}

/// PostgreSQL like repository. Likes have a composite key, so they do not go
/// through the generic base repository.
pub struct PostgresLikeRepository {
    db: DbConn,
}

impl PostgresLikeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let found = LikeEntity::find_by_id((user_id, post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.is_some())
    }

    async fn insert(&self, like: Like) -> Result<Like, RepoError> {
        let model: like::ActiveModel = like.into();
        let saved = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(saved.into())
    }

    async fn remove(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let result = LikeEntity::delete_by_id((user_id, post_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn count_for_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        LikeEntity::find()
            .inner_join(UserEntity)
            .filter(like::Column::PostId.eq(post_id))
            .filter(active_author())
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("ada@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
