//! Redis-backed counter store (optional, `redis` feature).
//!
//! `INCR` is atomic on the server and creates a missing key at 0 before
//! adding, which is exactly the counter contract. Redis knows nothing about
//! posts, so entity existence is checked by `ViewCounter` before incrementing.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::instrument;

use inkwell_core::PostId;

use super::r#trait::CounterStore;
use crate::error::StoreError;

/// Namespace for view-counter keys (`inkwell:views:<post id>`).
const KEY_PREFIX: &str = "inkwell:views";

#[derive(Clone)]
pub struct RedisCounterStore {
    conn: ConnectionManager,
}

impl RedisCounterStore {
    /// Connect to `redis_url` with an auto-reconnecting connection manager.
    pub async fn connect(redis_url: impl AsRef<str>) -> Result<Self, StoreError> {
        let client = redis::Client::open(redis_url.as_ref()).map_err(map_redis_error)?;
        let conn = ConnectionManager::new(client).await.map_err(map_redis_error)?;
        Ok(Self { conn })
    }

    fn key(&self, id: PostId) -> String {
        format!("{KEY_PREFIX}:{id}")
    }
}

fn map_redis_error(err: redis::RedisError) -> StoreError {
    match err.kind() {
        redis::ErrorKind::TypeError => StoreError::Corrupt(err.to_string()),
        _ => StoreError::Unavailable(err.to_string()),
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    #[instrument(skip(self), fields(post_id = %id), err)]
    async fn increment(&self, id: PostId) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        conn.incr(self.key(id), 1u64).await.map_err(map_redis_error)
    }

    #[instrument(skip(self), fields(post_id = %id), err)]
    async fn get(&self, id: PostId) -> Result<Option<u64>, StoreError> {
        let mut conn = self.conn.clone();
        conn.get(self.key(id)).await.map_err(map_redis_error)
    }

    async fn remove(&self, id: PostId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: u64 = conn.del(self.key(id)).await.map_err(map_redis_error)?;
        Ok(())
    }
}
