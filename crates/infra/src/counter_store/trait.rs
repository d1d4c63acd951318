use std::sync::Arc;

use async_trait::async_trait;

use inkwell_core::PostId;

use crate::error::StoreError;

/// Integer counters keyed by post id.
///
/// ## Implementation requirements
///
/// - `increment` applies exactly +1 atomically and returns the new value; a
///   missing counter starts at zero, so the first increment returns 1.
/// - Concurrent increments for the same key must never be lost.
/// - `get` returns `None` for a key that was never incremented.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, id: PostId) -> Result<u64, StoreError>;

    async fn get(&self, id: PostId) -> Result<Option<u64>, StoreError>;

    /// Drop the counter (owner deleted). Removing a missing counter is a no-op.
    async fn remove(&self, id: PostId) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> CounterStore for Arc<S>
where
    S: CounterStore + ?Sized,
{
    async fn increment(&self, id: PostId) -> Result<u64, StoreError> {
        (**self).increment(id).await
    }

    async fn get(&self, id: PostId) -> Result<Option<u64>, StoreError> {
        (**self).get(id).await
    }

    async fn remove(&self, id: PostId) -> Result<(), StoreError> {
        (**self).remove(id).await
    }
}
