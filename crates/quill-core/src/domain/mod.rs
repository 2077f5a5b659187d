//! Domain entities - the core business objects.

mod category;
mod comment;
mod like;
mod page;
mod post;
mod user;

pub use category::Category;
pub use comment::Comment;
pub use like::Like;
pub use page::{Authored, DEFAULT_PER_PAGE, MAX_PAGE, MAX_PER_PAGE, Page, PageRequest};
pub use post::Post;
pub use user::{Role, User, UserDetails, UserStatus};
