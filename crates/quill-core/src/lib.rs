//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, slug generation, visibility rules and the ports infrastructure implements.

pub mod domain;
pub mod error;
pub mod policy;
pub mod ports;
pub mod slug;
pub mod validation;

pub use error::{DomainError, RepoError};
pub use policy::{Denial, Viewer};
