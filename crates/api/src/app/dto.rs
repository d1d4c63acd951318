use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkwell_core::{Post, PostId, ViewCount};

// -------------------------
// Request DTOs
// -------------------------

/// `title` is optional at the wire level so a missing field becomes a
/// `validation_error` rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamespaceQuery {
    pub namespace: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: PostId,
    pub namespace: String,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id(),
            namespace: post.namespace().as_str().to_string(),
            title: post.title().to_string(),
            slug: post.slug().as_str().to_string(),
            created_at: post.created_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub id: PostId,
    pub views: u64,
}

impl ViewsResponse {
    pub fn new(id: PostId, views: ViewCount) -> Self {
        Self {
            id,
            views: views.get(),
        }
    }
}
