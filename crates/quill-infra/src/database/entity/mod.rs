//! SeaORM entities. Table layout matches the `migration` crate.

pub mod category;
pub mod comment;
pub mod like;
pub mod post;
pub mod user;
pub mod user_details;
