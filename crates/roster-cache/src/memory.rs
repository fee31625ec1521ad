//! [`MemoryCache`]: an in-process listing cache on [`moka`].

use std::time::Duration;

use moka::future::Cache;
use roster_core::{cache::ListingCache, listing::ListingKey, person::Person};

use crate::{Error, Result};

/// Cloning shares the underlying cache.
#[derive(Clone)]
pub struct MemoryCache {
  inner: Cache<ListingKey, Vec<Person>>,
}

impl MemoryCache {
  pub fn new(ttl: Duration, capacity: u64) -> Self {
    let inner = Cache::builder().max_capacity(capacity).time_to_live(ttl).build();
    Self { inner }
  }
}

impl ListingCache for MemoryCache {
  type Error = Error;

  async fn get(&self, key: &ListingKey) -> Result<Option<Vec<Person>>> {
    Ok(self.inner.get(key).await)
  }

  async fn set(&self, key: &ListingKey, people: &[Person]) -> Result<()> {
    self.inner.insert(key.clone(), people.to_vec()).await;
    Ok(())
  }

  async fn invalidate_all(&self) -> Result<()> {
    self.inner.invalidate_all();
    Ok(())
  }
}
