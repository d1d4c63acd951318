//! The post entity: owner of a slug and a view counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::PostId;
use crate::slug::Slug;

/// Scope within which slugs must be unique (e.g. all posts).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    pub const POSTS: &'static str = "posts";

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::validation("namespace must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn posts() -> Self {
        Self(Self::POSTS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::posts()
    }
}

impl core::fmt::Display for Namespace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Input for creating a post. The slug is derived, never supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub namespace: Namespace,
    pub title: String,
}

impl NewPost {
    /// Validate caller input: the title must contain something besides whitespace.
    pub fn new(namespace: Namespace, title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        Ok(Self { namespace, title })
    }
}

/// A persisted post. The slug is fixed at creation; there is no rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    namespace: Namespace,
    title: String,
    slug: Slug,
    created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: PostId,
        namespace: Namespace,
        title: impl Into<String>,
        slug: Slug,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            namespace,
            title: title.into(),
            slug,
            created_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
