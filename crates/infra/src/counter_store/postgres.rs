//! Postgres-backed counter store.
//!
//! The increment is one statement: an upsert that adds 1 to the stored value
//! and returns it. Concurrent callers are serialized by the row lock Postgres
//! takes for `ON CONFLICT DO UPDATE`, so no update is lost. The foreign key
//! on `post_views.post_id` turns an increment for a missing post into
//! SQLSTATE `23503`, surfaced as `StoreError::NotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use inkwell_core::PostId;

use super::r#trait::CounterStore;
use crate::error::{StoreError, map_sqlx_error};

#[derive(Debug, Clone)]
pub struct PostgresCounterStore {
    pool: Arc<PgPool>,
}

impl PostgresCounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn to_count(value: i64, operation: &str) -> Result<u64, StoreError> {
    u64::try_from(value)
        .map_err(|_| StoreError::Corrupt(format!("negative view count {value} in {operation}")))
}

#[async_trait]
impl CounterStore for PostgresCounterStore {
    #[instrument(skip(self), fields(post_id = %id), err)]
    async fn increment(&self, id: PostId) -> Result<u64, StoreError> {
        let views: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO post_views (post_id, views)
            VALUES ($1, 1)
            ON CONFLICT (post_id)
            DO UPDATE SET
                views = post_views.views + 1,
                updated_at = NOW()
            RETURNING views
            "#,
        )
        .bind(id.as_uuid())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("increment_views", e))?;

        to_count(views, "increment_views")
    }

    #[instrument(skip(self), fields(post_id = %id), err)]
    async fn get(&self, id: PostId) -> Result<Option<u64>, StoreError> {
        let views: Option<i64> =
            sqlx::query_scalar("SELECT views FROM post_views WHERE post_id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("get_views", e))?;

        views.map(|v| to_count(v, "get_views")).transpose()
    }

    async fn remove(&self, id: PostId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM post_views WHERE post_id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_views", e))?;
        Ok(())
    }
}
