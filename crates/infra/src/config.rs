//! Configuration loading from the process environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `INKWELL_BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `DATABASE_URL` | unset | Postgres URL; in-memory stores when unset |
//! | `REDIS_URL` | unset | Redis URL for view counters (`redis` feature) |
//! | `INKWELL_SLUG_MAX_ATTEMPTS` | `3` | slug insert attempts before `Conflict` |
//! | `INKWELL_SLUG_FALLBACK` | `untitled` | base for titles that normalize to nothing |

use std::net::SocketAddr;

use thiserror::Error;
use tracing::{info, warn};

use inkwell_core::SlugPolicy;
use inkwell_core::slug::DEFAULT_FALLBACK;

use crate::post_service::DEFAULT_MAX_SLUG_ATTEMPTS;

pub const BIND_ADDR: &str = "INKWELL_BIND_ADDR";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const REDIS_URL: &str = "REDIS_URL";
pub const SLUG_MAX_ATTEMPTS: &str = "INKWELL_SLUG_MAX_ATTEMPTS";
pub const SLUG_FALLBACK: &str = "INKWELL_SLUG_FALLBACK";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub slug_max_attempts: u32,
    pub slug_policy: SlugPolicy,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = or_default(&lookup, BIND_ADDR, DEFAULT_BIND_ADDR);
        let bind_addr = bind_raw.parse().map_err(|e: std::net::AddrParseError| {
            invalid(BIND_ADDR, &bind_raw, e.to_string())
        })?;

        let attempts_raw = or_default(&lookup, SLUG_MAX_ATTEMPTS, &DEFAULT_MAX_SLUG_ATTEMPTS.to_string());
        let slug_max_attempts: u32 = attempts_raw
            .parse()
            .map_err(|e: std::num::ParseIntError| invalid(SLUG_MAX_ATTEMPTS, &attempts_raw, e.to_string()))?;
        if slug_max_attempts == 0 {
            return Err(invalid(SLUG_MAX_ATTEMPTS, &attempts_raw, "must be at least 1"));
        }

        let fallback_raw = or_default(&lookup, SLUG_FALLBACK, DEFAULT_FALLBACK);
        let slug_policy = SlugPolicy::new(&fallback_raw)
            .map_err(|e| invalid(SLUG_FALLBACK, &fallback_raw, e.to_string()))?;

        let database_url = non_empty(lookup(DATABASE_URL));
        if database_url.is_none() {
            warn!("{DATABASE_URL} not set; posts and counters are kept in memory");
        }

        Ok(Self {
            bind_addr,
            database_url,
            redis_url: non_empty(lookup(REDIS_URL)),
            slug_max_attempts,
            slug_policy,
        })
    }
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match non_empty(lookup(key)) {
        Some(value) => value,
        None => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}
