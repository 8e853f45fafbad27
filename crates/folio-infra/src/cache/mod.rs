//! Page cache implementations - Redis and in-memory fallback.

mod memory;

#[cfg(feature = "redis")]
mod redis;

pub use memory::InMemoryPageCache;

#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisPageCache};
