use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;

use inkwell_core::{Namespace, Post, PostId, Slug, is_candidate};

use super::r#trait::PostStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Tables {
    posts: HashMap<PostId, Post>,
    /// Unique index on `(namespace, slug)`.
    slugs: HashMap<(Namespace, String), PostId>,
}

/// In-memory post store.
///
/// Intended for tests/dev. The unique index is checked and updated under the
/// same write lock as the row itself, so concurrent inserts of one slug see
/// exactly one winner.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    tables: RwLock<Tables>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn slugs_with_prefix(
        &self,
        namespace: &Namespace,
        base: &str,
    ) -> Result<HashSet<String>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::poisoned())?;
        Ok(tables
            .slugs
            .keys()
            .filter(|(ns, slug)| ns == namespace && is_candidate(base, slug))
            .map(|(_, slug)| slug.clone())
            .collect())
    }

    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::poisoned())?;

        let key = (post.namespace().clone(), post.slug().to_string());
        if tables.slugs.contains_key(&key) {
            return Err(StoreError::Conflict(format!(
                "slug '{}' already exists in namespace '{}'",
                post.slug(),
                post.namespace()
            )));
        }
        if tables.posts.contains_key(&post.id()) {
            return Err(StoreError::Conflict(format!(
                "post {} already exists",
                post.id()
            )));
        }

        tables.slugs.insert(key, post.id());
        tables.posts.insert(post.id(), post.clone());
        Ok(())
    }

    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::poisoned())?;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn get_by_slug(
        &self,
        namespace: &Namespace,
        slug: &Slug,
    ) -> Result<Option<Post>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::poisoned())?;
        let key = (namespace.clone(), slug.to_string());
        Ok(tables
            .slugs
            .get(&key)
            .and_then(|id| tables.posts.get(id))
            .cloned())
    }

    async fn exists(&self, id: PostId) -> Result<bool, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::poisoned())?;
        Ok(tables.posts.contains_key(&id))
    }

    async fn list(&self, namespace: &Namespace) -> Result<Vec<Post>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::poisoned())?;
        let mut posts: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.namespace() == namespace)
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(posts)
    }

    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::poisoned())?;
        match tables.posts.remove(&id) {
            Some(post) => {
                tables
                    .slugs
                    .remove(&(post.namespace().clone(), post.slug().to_string()));
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn post(ns: &str, slug: &str) -> Post {
        Post::new(
            PostId::new(),
            Namespace::new(ns).unwrap(),
            slug,
            Slug::parse(slug).unwrap(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn duplicate_slug_in_namespace_conflicts() {
        let store = InMemoryPostStore::new();
        store.insert(&post("posts", "hello")).await.unwrap();

        let err = store.insert(&post("posts", "hello")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn same_slug_in_other_namespace_is_fine() {
        let store = InMemoryPostStore::new();
        store.insert(&post("posts", "hello")).await.unwrap();
        store.insert(&post("pages", "hello")).await.unwrap();
    }

    #[tokio::test]
    async fn prefix_lookup_returns_only_candidate_family() {
        let store = InMemoryPostStore::new();
        for slug in ["hello", "hello-1", "hello-world", "other"] {
            store.insert(&post("posts", slug)).await.unwrap();
        }
        store.insert(&post("pages", "hello-2")).await.unwrap();

        let found = store
            .slugs_with_prefix(&Namespace::posts(), "hello")
            .await
            .unwrap();
        let expected: HashSet<String> = ["hello", "hello-1"].iter().map(|s| s.to_string()).collect();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn delete_frees_the_slug() {
        let store = InMemoryPostStore::new();
        let p = post("posts", "hello");
        store.insert(&p).await.unwrap();

        assert!(store.delete(p.id()).await.unwrap());
        assert!(!store.delete(p.id()).await.unwrap());
        assert!(!store.exists(p.id()).await.unwrap());
        store.insert(&post("posts", "hello")).await.unwrap();
    }

    #[tokio::test]
    async fn lookup_by_slug_is_namespace_scoped() {
        let store = InMemoryPostStore::new();
        let p = post("posts", "hello");
        store.insert(&p).await.unwrap();

        let slug = Slug::parse("hello").unwrap();
        let hit = store.get_by_slug(&Namespace::posts(), &slug).await.unwrap();
        assert_eq!(hit.map(|p| p.id()), Some(p.id()));

        let pages = Namespace::new("pages").unwrap();
        assert!(store.get_by_slug(&pages, &slug).await.unwrap().is_none());
    }
}
