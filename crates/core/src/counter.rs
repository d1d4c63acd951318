//! View counts.
//!
//! A post's view count starts at zero, only ever grows, and each successful
//! increment raises it by exactly one. The atomic add itself lives in the
//! counter store; this type just carries the value.

use serde::{Deserialize, Serialize};

/// Non-negative view count of a single post.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewCount(u64);

impl ViewCount {
    pub const ZERO: ViewCount = ViewCount(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ViewCount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ViewCount> for u64 {
    fn from(value: ViewCount) -> Self {
        value.0
    }
}

impl core::fmt::Display for ViewCount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
