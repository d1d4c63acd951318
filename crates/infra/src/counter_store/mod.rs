//! View counter persistence boundary.
//!
//! Every backend performs the +1 as a single atomic operation (atomic add,
//! `INSERT .. ON CONFLICT DO UPDATE SET views = views + 1`, or Redis `INCR`).
//! Callers never read, add and write back themselves.

pub mod in_memory;
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis_counter;
pub mod r#trait;

pub use in_memory::InMemoryCounterStore;
pub use postgres::PostgresCounterStore;
#[cfg(feature = "redis")]
pub use redis_counter::RedisCounterStore;
pub use r#trait::CounterStore;
