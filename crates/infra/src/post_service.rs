//! Post creation with optimistic slug assignment.
//!
//! ```text
//! NewPost
//!   ↓
//! 1. Normalize title → base (fallback when empty)
//!   ↓
//! 2. Fetch stored slugs in base's candidate family
//!   ↓
//! 3. Pick first free candidate (pure)
//!   ↓
//! 4. Insert; unique violation → back to 2, at most `max_attempts` times
//! ```
//!
//! There is no lock between steps 2 and 4. Two creators may pick the same
//! slug; the store's unique constraint lets exactly one win and the other
//! re-fetches. Only `StoreError::Conflict` is retried; transient failures are
//! returned to the caller as `Unavailable`.

use chrono::Utc;
use tracing::{info, instrument, warn};

use inkwell_core::{
    DomainError, DomainResult, Namespace, NewPost, Post, PostId, Slug, SlugPolicy,
    assign_slug_with_policy,
};

use crate::counter_store::CounterStore;
use crate::error::StoreError;
use crate::post_store::PostStore;

/// Default number of insert attempts before giving up with `Conflict`.
pub const DEFAULT_MAX_SLUG_ATTEMPTS: u32 = 3;

pub struct PostService<P, C> {
    posts: P,
    counters: C,
    policy: SlugPolicy,
    max_attempts: u32,
}

impl<P, C> PostService<P, C>
where
    P: PostStore,
    C: CounterStore,
{
    pub fn new(posts: P, counters: C) -> Self {
        Self {
            posts,
            counters,
            policy: SlugPolicy::default(),
            max_attempts: DEFAULT_MAX_SLUG_ATTEMPTS,
        }
    }

    pub fn with_policy(mut self, policy: SlugPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the insert attempt budget (clamped to at least one attempt).
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Create a post, assigning it a slug unique within its namespace.
    #[instrument(skip(self, input), fields(namespace = %input.namespace))]
    pub async fn create_post(&self, input: NewPost) -> DomainResult<Post> {
        let base = self.policy.base_for(&input.title);

        for attempt in 1..=self.max_attempts {
            let existing = self.posts.slugs_with_prefix(&input.namespace, &base).await?;
            let slug = assign_slug_with_policy(&input.title, &existing, &self.policy);

            let post = Post::new(
                PostId::new(),
                input.namespace.clone(),
                input.title.clone(),
                slug,
                Utc::now(),
            );

            match self.posts.insert(&post).await {
                Ok(()) => {
                    info!(post_id = %post.id(), slug = %post.slug(), attempt, "post created");
                    return Ok(post);
                }
                Err(StoreError::Conflict(reason)) => {
                    warn!(
                        slug = %post.slug(),
                        attempt,
                        max_attempts = self.max_attempts,
                        %reason,
                        "slug taken concurrently; retrying with fresh candidates"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(DomainError::conflict(format!(
            "could not assign a unique slug for '{base}' after {} attempts",
            self.max_attempts
        )))
    }

    pub async fn get_post(&self, id: PostId) -> DomainResult<Post> {
        self.posts.get(id).await?.ok_or(DomainError::NotFound)
    }

    /// Look a post up by slug. A malformed slug cannot name any post.
    pub async fn get_by_slug(&self, namespace: &Namespace, slug: &str) -> DomainResult<Post> {
        let Ok(slug) = Slug::parse(slug) else {
            return Err(DomainError::NotFound);
        };
        self.posts
            .get_by_slug(namespace, &slug)
            .await?
            .ok_or(DomainError::NotFound)
    }

    pub async fn list_posts(&self, namespace: &Namespace) -> DomainResult<Vec<Post>> {
        Ok(self.posts.list(namespace).await?)
    }

    /// Delete a post together with its view counter.
    #[instrument(skip(self), fields(post_id = %id))]
    pub async fn delete_post(&self, id: PostId) -> DomainResult<()> {
        if !self.posts.delete(id).await? {
            return Err(DomainError::NotFound);
        }
        // The post is already gone, so the delete stands; a stray counter is
        // only logged.
        if let Err(e) = self.counters.remove(id).await {
            warn!(error = %e, "post deleted but its view counter could not be removed");
        }
        info!("post deleted");
        Ok(())
    }
}
