//! Postgres-backed post store.
//!
//! Slug uniqueness is enforced by the `posts_namespace_slug_key` unique
//! constraint; a losing concurrent insert fails with SQLSTATE `23505`, which
//! is surfaced as `StoreError::Conflict` so the caller can re-fetch and retry.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};

use inkwell_core::{Namespace, Post, PostId, Slug, is_candidate};

use super::r#trait::PostStore;
use crate::error::{StoreError, map_sqlx_error};

/// Schema for posts and their view counters.
///
/// `post_views` rows cascade with their post, and the foreign key rejects
/// increments for posts that do not exist.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id          UUID PRIMARY KEY,
    namespace   TEXT NOT NULL,
    title       TEXT NOT NULL,
    slug        TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT posts_namespace_slug_key UNIQUE (namespace, slug)
);

CREATE TABLE IF NOT EXISTS post_views (
    post_id     UUID PRIMARY KEY REFERENCES posts (id) ON DELETE CASCADE,
    views       BIGINT NOT NULL DEFAULT 0 CHECK (views >= 0),
    updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
"#;

/// Postgres-backed post store.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresPostStore {
    pool: Arc<PgPool>,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    #[instrument(
        skip(self),
        fields(namespace = %namespace, candidates = tracing::field::Empty),
        err
    )]
    async fn slugs_with_prefix(
        &self,
        namespace: &Namespace,
        base: &str,
    ) -> Result<HashSet<String>, StoreError> {
        // Slug bases only contain [a-z0-9-], so no LIKE metacharacters need escaping.
        let rows = sqlx::query(
            r#"
            SELECT slug
            FROM posts
            WHERE namespace = $1 AND (slug = $2 OR slug LIKE $3)
            "#,
        )
        .bind(namespace.as_str())
        .bind(base)
        .bind(format!("{base}-%"))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("slugs_with_prefix", e))?;

        let mut slugs = HashSet::with_capacity(rows.len());
        for row in rows {
            let slug: String = row
                .try_get("slug")
                .map_err(|e| map_sqlx_error("slugs_with_prefix", e))?;
            if is_candidate(base, &slug) {
                slugs.insert(slug);
            }
        }

        Span::current().record("candidates", slugs.len());
        Ok(slugs)
    }

    #[instrument(
        skip(self, post),
        fields(post_id = %post.id(), slug = %post.slug()),
        err
    )]
    async fn insert(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, namespace, title, slug, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.namespace().as_str())
        .bind(post.title())
        .bind(post.slug().as_str())
        .bind(post.created_at())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_post", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(post_id = %id), err)]
    async fn get(&self, id: PostId) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, namespace, title, slug, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_post", e))?;

        row.map(|r| PostRow::decode(&r)).transpose()
    }

    #[instrument(skip(self), fields(namespace = %namespace, slug = %slug), err)]
    async fn get_by_slug(
        &self,
        namespace: &Namespace,
        slug: &Slug,
    ) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, namespace, title, slug, created_at
            FROM posts
            WHERE namespace = $1 AND slug = $2
            "#,
        )
        .bind(namespace.as_str())
        .bind(slug.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_post_by_slug", e))?;

        row.map(|r| PostRow::decode(&r)).transpose()
    }

    async fn exists(&self, id: PostId) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM posts WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("post_exists", e))?;
        Ok(exists)
    }

    #[instrument(skip(self), fields(namespace = %namespace), err)]
    async fn list(&self, namespace: &Namespace) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, namespace, title, slug, created_at
            FROM posts
            WHERE namespace = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(namespace.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_posts", e))?;

        rows.iter().map(PostRow::decode).collect()
    }

    #[instrument(skip(self), fields(post_id = %id), err)]
    async fn delete(&self, id: PostId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_post", e))?;
        Ok(result.rows_affected() > 0)
    }
}

// SQLx row types

struct PostRow;

impl PostRow {
    fn decode(row: &sqlx::postgres::PgRow) -> Result<Post, StoreError> {
        let id: uuid::Uuid = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("decode_post", e))?;
        let namespace: String = row
            .try_get("namespace")
            .map_err(|e| map_sqlx_error("decode_post", e))?;
        let title: String = row
            .try_get("title")
            .map_err(|e| map_sqlx_error("decode_post", e))?;
        let slug: String = row
            .try_get("slug")
            .map_err(|e| map_sqlx_error("decode_post", e))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| map_sqlx_error("decode_post", e))?;

        let namespace =
            Namespace::new(namespace).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let slug = Slug::parse(slug).map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(Post::new(
            PostId::from_uuid(id),
            namespace,
            title,
            slug,
            created_at,
        ))
    }
}
