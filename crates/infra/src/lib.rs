//! Infrastructure layer: stores, services, config.
//!
//! Domain logic lives in `inkwell-core`; this crate decides where posts and
//! counters are persisted and how the slug retry and view counting compose
//! on top of those stores.

pub mod config;
pub mod counter_store;
pub mod error;
pub mod post_service;
pub mod post_store;
pub mod view_counter;


pub use config::{AppConfig, ConfigError};
pub use counter_store::{CounterStore, InMemoryCounterStore, PostgresCounterStore};
pub use error::StoreError;
pub use post_service::PostService;
pub use post_store::{InMemoryPostStore, PostStore, PostgresPostStore};
pub use view_counter::ViewCounter;

#[cfg(feature = "redis")]
pub use counter_store::RedisCounterStore;
