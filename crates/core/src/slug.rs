//! URL slugs: normalization and collision resolution.
//!
//! A slug is derived once from a post title at creation time and never
//! changes afterwards. Normalization is deterministic and the steps run in
//! this order:
//!
//! 1. lowercase
//! 2. trim surrounding whitespace
//! 3. drop everything that is not a word character (`[a-z0-9_]`), whitespace or `-`
//! 4. collapse runs of whitespace / `_` / `-` into a single `-`
//! 5. strip leading and trailing `-`
//!
//! Collision resolution walks `base`, `base-1`, `base-2`, ... and picks the
//! first candidate absent from the supplied set. The functions here are pure;
//! uniqueness under concurrency is enforced by the store (unique index) plus
//! a bounded retry in the post service.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("static regex"));

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s_-]+").expect("static regex"));

/// Placeholder base used when a title normalizes to nothing.
pub const DEFAULT_FALLBACK: &str = "untitled";

/// Normalize free text into slug form.
///
/// Total over all inputs; may return an empty string (e.g. for `"!!!"`).
pub fn normalize(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = DISALLOWED.replace_all(lowered.trim(), "");
    let collapsed = SEPARATOR_RUN.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Candidate slugs for `base` in probing order: `base`, `base-1`, `base-2`, ...
pub fn candidate_slugs(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((1u64..).map(move |n| format!("{base}-{n}")))
}

/// Whether `slug` belongs to the candidate family of `base` (`base` or `base-N`).
///
/// Stores use this to narrow the "existing" set to what can actually collide.
pub fn is_candidate(base: &str, slug: &str) -> bool {
    match slug.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('-')
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// First candidate for `base` that is not in `existing`.
///
/// Terminates because `existing` is finite.
pub fn resolve(base: &str, existing: &HashSet<String>) -> String {
    candidate_slugs(base)
        .find(|candidate| !existing.contains(candidate))
        .unwrap_or_default()
}

/// Derive a slug from `title` that is not a member of `existing`.
///
/// An empty normalized base is kept as-is: `assign_slug("!!!", &{})` is `""`.
/// Use [`SlugPolicy::assign`] when a placeholder is wanted instead.
pub fn assign_slug(title: &str, existing: &HashSet<String>) -> String {
    resolve(&normalize(title), existing)
}

/// Same as [`assign_slug`], substituting the policy fallback for an empty base.
pub fn assign_slug_with_policy(
    title: &str,
    existing: &HashSet<String>,
    policy: &SlugPolicy,
) -> Slug {
    policy.assign(title, existing)
}

/// Policy applied by the creation path on top of the pure assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugPolicy {
    fallback: String,
}

impl SlugPolicy {
    /// Build a policy with a custom fallback base.
    ///
    /// The fallback is normalized; it must not normalize to an empty string.
    pub fn new(fallback: &str) -> Result<Self, DomainError> {
        let fallback = normalize(fallback);
        if fallback.is_empty() {
            return Err(DomainError::validation(
                "slug fallback must contain at least one letter or digit",
            ));
        }
        Ok(Self { fallback })
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Normalized base for `title`, never empty.
    pub fn base_for(&self, title: &str) -> String {
        let base = normalize(title);
        if base.is_empty() {
            self.fallback.clone()
        } else {
            base
        }
    }

    /// Assign a slug for `title` avoiding every member of `existing`.
    pub fn assign(&self, title: &str, existing: &HashSet<String>) -> Slug {
        // base is non-empty and normalized, so every candidate is a valid slug.
        Slug(resolve(&self.base_for(title), existing))
    }
}

impl Default for SlugPolicy {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_FALLBACK.to_string(),
        }
    }
}

/// A validated, non-empty slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Accept an already-normalized slug (e.g. read back from storage or a URL).
    pub fn parse(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if !is_valid_slug(&value) {
            return Err(DomainError::validation(format!("malformed slug: {value:?}")));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Slug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Slug {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

/// Non-empty, `[a-z0-9-]` only, no leading/trailing or doubled hyphen.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && !value.starts_with('-')
        && !value.ends_with('-')
        && !value.contains("--")
        && value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}
