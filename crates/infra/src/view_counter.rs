//! View counting for posts.
//!
//! `read_count` and `increment_and_read` distinguish a missing post (an
//! error) from a post that has simply never been viewed (an implicit zero).
//! The increment is delegated to the counter store's atomic primitive.
//!
//! A post deleted between the existence check and the increment must not
//! leave a counter behind. Postgres rejects such an increment through its
//! foreign key; for the other backends the post is checked again after the
//! increment and the counter is dropped if the post has gone.

use tracing::{debug, instrument, warn};

use inkwell_core::{DomainError, DomainResult, PostId, ViewCount};

use crate::counter_store::CounterStore;
use crate::post_store::PostStore;

pub struct ViewCounter<P, C> {
    posts: P,
    counters: C,
}

impl<P, C> ViewCounter<P, C>
where
    P: PostStore,
    C: CounterStore,
{
    pub fn new(posts: P, counters: C) -> Self {
        Self { posts, counters }
    }

    /// Current view count; `NotFound` only if the post itself is missing.
    pub async fn read_count(&self, id: PostId) -> DomainResult<ViewCount> {
        if !self.posts.exists(id).await? {
            return Err(DomainError::NotFound);
        }
        let views = self.counters.get(id).await?.unwrap_or(0);
        Ok(ViewCount::new(views))
    }

    /// Record one view and return the count including it.
    #[instrument(skip(self), fields(post_id = %id))]
    pub async fn increment_and_read(&self, id: PostId) -> DomainResult<ViewCount> {
        if !self.posts.exists(id).await? {
            return Err(DomainError::NotFound);
        }
        let views = self.counters.increment(id).await?;

        if !self.posts.exists(id).await? {
            warn!("post deleted while being viewed; dropping its counter");
            self.counters.remove(id).await?;
            return Err(DomainError::NotFound);
        }

        debug!(views, "view recorded");
        Ok(ViewCount::new(views))
    }
}
