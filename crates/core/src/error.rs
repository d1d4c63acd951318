//! Errors surfaced by post creation, lookup and view counting.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Failure of a post or view-count operation.
///
/// Slug assignment itself never fails; these variants only arise at the
/// persistence boundary or from malformed caller input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. missing title).
    #[error("invalid input: {0}")]
    Validation(String),

    /// A post id did not parse.
    #[error("malformed id: {0}")]
    InvalidId(String),

    /// The referenced entity does not exist.
    #[error("post not found")]
    NotFound,

    /// A uniqueness constraint could not be satisfied (retry budget exhausted).
    #[error("slug conflict: {0}")]
    Conflict(String),

    /// Transient storage failure or timeout; callers may retry.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
