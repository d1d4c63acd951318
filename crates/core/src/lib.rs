//! Blog domain building blocks.
//!
//! This crate contains **pure domain** logic (no IO, no storage): slug
//! assignment, view-count values, and the post entity that owns them.

pub mod counter;
pub mod error;
pub mod id;
pub mod post;
pub mod slug;

pub use counter::ViewCount;
pub use error::{DomainError, DomainResult};
pub use id::PostId;
pub use post::{Namespace, NewPost, Post};
pub use slug::{
    Slug, SlugPolicy, assign_slug, assign_slug_with_policy, candidate_slugs, is_candidate, normalize,
};
