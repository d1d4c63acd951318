//! Post persistence boundary.
//!
//! The store owns the `(namespace, slug)` uniqueness constraint. Slug
//! assignment happens above it (see `post_service`); a losing racer gets
//! `StoreError::Conflict` and retries with a fresh candidate set.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;
pub use r#trait::PostStore;
