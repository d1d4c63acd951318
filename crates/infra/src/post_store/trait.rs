use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use inkwell_core::{Namespace, Post, PostId, Slug};

use crate::error::StoreError;

/// Persistence for posts, with slugs unique per namespace.
///
/// ## Implementation requirements
///
/// - `insert` must reject a duplicate `(namespace, slug)` (or a duplicate id)
///   with `StoreError::Conflict`, atomically with the write.
/// - `slugs_with_prefix` returns every stored slug in `namespace` that is
///   `base` or `base-N`; it may be slightly stale, the insert check is what
///   guarantees uniqueness.
/// - Transient backend failures surface as `StoreError::Unavailable`.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Slugs in `namespace` that could collide with candidates of `base`.
    async fn slugs_with_prefix(
        &self,
        namespace: &Namespace,
        base: &str,
    ) -> Result<HashSet<String>, StoreError>;

    /// Persist a new post.
    async fn insert(&self, post: &Post) -> Result<(), StoreError>;

    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError>;

    async fn get_by_slug(
        &self,
        namespace: &Namespace,
        slug: &Slug,
    ) -> Result<Option<Post>, StoreError>;

    async fn exists(&self, id: PostId) -> Result<bool, StoreError>;

    /// All posts in `namespace`, newest first.
    async fn list(&self, namespace: &Namespace) -> Result<Vec<Post>, StoreError>;

    /// Remove a post. Returns `false` if it did not exist.
    async fn delete(&self, id: PostId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> PostStore for Arc<S>
where
    S: PostStore + ?Sized,
{
    async fn slugs_with_prefix(
        &self,
        namespace: &Namespace,
        base: &str,
    ) -> Result<HashSet<String>, StoreError> {
        (**self).slugs_with_prefix(namespace, base).await
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        (**self).insert(post).await
    }

    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        (**self).get(id).await
    }

    async fn get_by_slug(
        &self,
        namespace: &Namespace,
        slug: &Slug,
    ) -> Result<Option<Post>, StoreError> {
        (**self).get_by_slug(namespace, slug).await
    }

    async fn exists(&self, id: PostId) -> Result<bool, StoreError> {
        (**self).exists(id).await
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<Post>, StoreError> {
        (**self).list(namespace).await
    }

    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
