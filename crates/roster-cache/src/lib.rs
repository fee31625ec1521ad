//! Listing cache backends for the Roster people directory.
//!
//! - [`RedisCache`]: shared cache for deployments, entries stored as JSON.
//! - [`MemoryCache`]: per-process cache for local runs and tests.
//!
//! [`AnyCache`] picks one at startup from [`CacheConfig`].

mod memory;
mod redis_cache;

pub mod error;

use std::time::Duration;

use roster_core::{cache::ListingCache, listing::ListingKey, person::Person};
use serde::Deserialize;

pub use error::{Error, Result};
pub use memory::MemoryCache;
pub use redis_cache::RedisCache;

/// Listings expire after two days unless invalidated earlier.
pub const DEFAULT_TTL: Duration = Duration::from_secs(48 * 60 * 60);

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
  #[default]
  Redis,
  Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  pub backend:         CacheBackend,
  pub redis_url:       String,
  pub ttl_secs:        u64,
  /// Entry cap for the memory backend.
  pub memory_capacity: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      backend:         CacheBackend::default(),
      redis_url:       "redis://127.0.0.1:6379/0".to_string(),
      ttl_secs:        DEFAULT_TTL.as_secs(),
      memory_capacity: 10_000,
    }
  }
}

impl CacheConfig {
  pub fn ttl(&self) -> Duration { Duration::from_secs(self.ttl_secs) }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Either backend behind one concrete type.
#[derive(Clone)]
pub enum AnyCache {
  Redis(RedisCache),
  Memory(MemoryCache),
}

impl AnyCache {
  /// Build the configured backend. Redis is pinged before returning.
  pub async fn from_config(config: &CacheConfig) -> Result<Self> {
    match config.backend {
      CacheBackend::Redis => {
        Ok(Self::Redis(RedisCache::connect(&config.redis_url, config.ttl()).await?))
      }
      CacheBackend::Memory => {
        Ok(Self::Memory(MemoryCache::new(config.ttl(), config.memory_capacity)))
      }
    }
  }
}

impl ListingCache for AnyCache {
  type Error = Error;

  async fn get(&self, key: &ListingKey) -> Result<Option<Vec<Person>>> {
    match self {
      Self::Redis(c) => c.get(key).await,
      Self::Memory(c) => c.get(key).await,
    }
  }

  async fn set(&self, key: &ListingKey, people: &[Person]) -> Result<()> {
    match self {
      Self::Redis(c) => c.set(key, people).await,
      Self::Memory(c) => c.set(key, people).await,
    }
  }

  async fn invalidate_all(&self) -> Result<()> {
    match self {
      Self::Redis(c) => c.invalidate_all().await,
      Self::Memory(c) => c.invalidate_all().await,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn config_defaults_to_two_day_ttl() {
    let config = CacheConfig::default();
    assert_eq!(config.ttl(), DEFAULT_TTL);
    assert_eq!(config.backend, CacheBackend::Redis);
  }

  #[tokio::test]
  async fn memory_backend_builds_without_network() {
    let config = CacheConfig { backend: CacheBackend::Memory, ..CacheConfig::default() };
    let cache = AnyCache::from_config(&config).await.unwrap();
    assert!(matches!(cache, AnyCache::Memory(_)));
  }
}
