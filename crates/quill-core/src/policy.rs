//! Visibility and authorization rules.
//!
//! Every check is a pure function of already-loaded entities. Rules apply in a
//! fixed order and the first failing rule decides the outcome:
//!
//! 1. the acting account must be active to write anything;
//! 2. content whose author is inactive does not exist for any reader;
//! 3. unpublished posts exist only for their owner and admins;
//! 4. posts are mutable by their owner, comments by their owner or an admin;
//! 5. categories and account moderation are admin-only.

use uuid::Uuid;

use crate::domain::{Comment, Post, Role, User};

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    /// Hide the entity's existence from the caller.
    #[error("not found")]
    NotFound,
    /// The caller is known but not allowed.
    #[error("forbidden")]
    Forbidden,
}

pub type Decision = Result<(), Denial>;

/// Who is reading. Only constructed for active accounts; anonymous readers
/// are `None` at the call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: Uuid,
    pub role: Role,
}

impl Viewer {
    /// Build a viewer from a loaded account, dropping inactive ones.
    pub fn from_account(user: &User) -> Option<Self> {
        user.is_active().then_some(Self {
            id: user.id,
            role: user.role,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Rule 1: the acting account must be active and not soft-deleted.
pub fn ensure_can_act(actor: &User) -> Decision {
    if actor.is_active() {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Rule 2: content of an inactive author is hidden from everyone.
pub fn ensure_author_visible(author: &User) -> Decision {
    if author.is_active() {
        Ok(())
    } else {
        Err(Denial::NotFound)
    }
}

/// Rules 2 and 3 for reading a post.
pub fn can_view_post(viewer: Option<&Viewer>, post: &Post, author: &User) -> Decision {
    ensure_author_visible(author)?;

    if post.is_published {
        return Ok(());
    }

    match viewer {
        Some(v) if v.id == post.user_id || v.is_admin() => Ok(()),
        _ => Err(Denial::NotFound),
    }
}

/// Reading a comment requires the comment's author and the post to be visible.
pub fn can_view_comment(
    viewer: Option<&Viewer>,
    comment_author: &User,
    post: &Post,
    post_author: &User,
) -> Decision {
    ensure_author_visible(comment_author)?;
    can_view_post(viewer, post, post_author)
}

/// Rules 1 and 4 for updating or deleting a post.
pub fn can_modify_post(actor: &User, post: &Post) -> Decision {
    ensure_can_act(actor)?;
    if post.is_owned_by(actor.id) {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Rules 1 and 4 for updating or deleting a comment.
pub fn can_modify_comment(actor: &User, comment: &Comment) -> Decision {
    ensure_can_act(actor)?;
    if comment.is_owned_by(actor.id) || actor.is_admin() {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Rules 1 and 5.
pub fn can_manage_categories(actor: &User) -> Decision {
    ensure_can_act(actor)?;
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

/// Admins may change other accounts' status, never their own.
pub fn can_moderate_user(actor: &User, target: &User) -> Decision {
    ensure_can_act(actor)?;
    if actor.is_admin() && actor.id != target.id {
        Ok(())
    } else {
        Err(Denial::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserStatus;

    fn user(role: Role) -> User {
        let mut u = User::new(
            format!("u{}", Uuid::new_v4().simple()),
            "u@example.com".into(),
            "hash".into(),
        );
        u.role = role;
        u
    }

    fn post_by(author: &User, published: bool) -> Post {
        Post::new(
            author.id,
            None,
            "T".into(),
            "t".into(),
            "C".into(),
            published,
        )
    }

    fn viewer(u: &User) -> Viewer {
        Viewer::from_account(u).unwrap()
    }

    #[test]
    fn test_draft_visible_to_owner_and_admin_only() {
        let owner = user(Role::User);
        let admin = user(Role::Admin);
        let other = user(Role::User);
        let post = post_by(&owner, false);

        assert_eq!(can_view_post(Some(&viewer(&owner)), &post, &owner), Ok(()));
        assert_eq!(can_view_post(Some(&viewer(&admin)), &post, &owner), Ok(()));
        assert_eq!(
            can_view_post(Some(&viewer(&other)), &post, &owner),
            Err(Denial::NotFound)
        );
        assert_eq!(can_view_post(None, &post, &owner), Err(Denial::NotFound));
    }

    #[test]
    fn test_published_post_visible_to_anonymous() {
        let owner = user(Role::User);
        let post = post_by(&owner, true);
        assert_eq!(can_view_post(None, &post, &owner), Ok(()));
    }

    #[test]
    fn test_inactive_author_hides_content_from_everyone() {
        let admin = user(Role::Admin);
        for status in [UserStatus::Suspended, UserStatus::Deleted] {
            let mut owner = user(Role::User);
            let post = post_by(&owner, true);
            let owner_view = viewer(&owner);
            owner.set_status(status);

            assert_eq!(can_view_post(None, &post, &owner), Err(Denial::NotFound));
            assert_eq!(
                can_view_post(Some(&owner_view), &post, &owner),
                Err(Denial::NotFound)
            );
            assert_eq!(
                can_view_post(Some(&viewer(&admin)), &post, &owner),
                Err(Denial::NotFound)
            );
        }
    }

    #[test]
    fn test_comment_hidden_when_comment_author_inactive() {
        let post_author = user(Role::User);
        let mut commenter = user(Role::User);
        commenter.soft_delete();
        let post = post_by(&post_author, true);

        assert_eq!(
            can_view_comment(None, &commenter, &post, &post_author),
            Err(Denial::NotFound)
        );
    }

    #[test]
    fn test_comment_delete_by_author_or_admin() {
        let author = user(Role::User);
        let admin = user(Role::Admin);
        let other = user(Role::User);
        let comment = Comment::new(author.id, Uuid::new_v4(), "hi".into());

        assert_eq!(can_modify_comment(&author, &comment), Ok(()));
        assert_eq!(can_modify_comment(&admin, &comment), Ok(()));
        assert_eq!(
            can_modify_comment(&other, &comment),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn test_post_mutation_is_owner_only() {
        let owner = user(Role::User);
        let admin = user(Role::Admin);
        let post = post_by(&owner, true);

        assert_eq!(can_modify_post(&owner, &post), Ok(()));
        assert_eq!(can_modify_post(&admin, &post), Err(Denial::Forbidden));
    }

    #[test]
    fn test_inactive_actor_cannot_write() {
        let mut owner = user(Role::User);
        let post = post_by(&owner, true);
        owner.set_status(UserStatus::Suspended);

        assert_eq!(ensure_can_act(&owner), Err(Denial::Forbidden));
        assert_eq!(can_modify_post(&owner, &post), Err(Denial::Forbidden));

        let mut admin = user(Role::Admin);
        admin.soft_delete();
        assert_eq!(can_manage_categories(&admin), Err(Denial::Forbidden));
    }

    #[test]
    fn test_category_management_requires_admin() {
        assert_eq!(can_manage_categories(&user(Role::Admin)), Ok(()));
        assert_eq!(
            can_manage_categories(&user(Role::User)),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn test_admin_cannot_moderate_self() {
        let admin = user(Role::Admin);
        let target = user(Role::User);
        assert_eq!(can_moderate_user(&admin, &target), Ok(()));
        assert_eq!(can_moderate_user(&admin, &admin), Err(Denial::Forbidden));
        assert_eq!(
            can_moderate_user(&target, &admin),
            Err(Denial::Forbidden)
        );
    }

    #[test]
    fn test_inactive_accounts_do_not_become_viewers() {
        let mut u = user(Role::Admin);
        u.set_status(UserStatus::Suspended);
        assert!(Viewer::from_account(&u).is_none());
    }
}
