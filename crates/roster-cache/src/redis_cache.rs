//! [`RedisCache`]: listings stored as JSON strings with a fixed TTL.

use std::time::Duration;

use redis::aio::ConnectionManager;
use roster_core::{
  cache::ListingCache,
  listing::{LISTING_KEY_PATTERN, ListingKey},
  person::Person,
};

use crate::{Error, Result};

/// Cloning is cheap; the connection manager is shared and reconnects on its
/// own after a dropped connection.
#[derive(Clone)]
pub struct RedisCache {
  conn: ConnectionManager,
  ttl:  Duration,
}

impl RedisCache {
  /// Connect to `url` and verify the server answers `PING`.
  pub async fn connect(url: &str, ttl: Duration) -> Result<Self> {
    let client = redis::Client::open(url)?;
    let mut conn = ConnectionManager::new(client).await?;
    let _: String = redis::cmd("PING").query_async(&mut conn).await?;
    tracing::info!(ttl_secs = ttl.as_secs(), "connected to redis listing cache");
    Ok(Self { conn, ttl })
  }
}

impl ListingCache for RedisCache {
  type Error = Error;

  async fn get(&self, key: &ListingKey) -> Result<Option<Vec<Person>>> {
    let mut conn = self.conn.clone();
    let raw: Option<String> = redis::cmd("GET").arg(key.as_str()).query_async(&mut conn).await?;
    raw.map(|json| serde_json::from_str(&json)).transpose().map_err(Error::from)
  }

  async fn set(&self, key: &ListingKey, people: &[Person]) -> Result<()> {
    let json = serde_json::to_string(people)?;
    let mut conn = self.conn.clone();
    let _: () = redis::cmd("SET")
      .arg(key.as_str())
      .arg(json)
      .arg("EX")
      .arg(self.ttl.as_secs().max(1))
      .query_async(&mut conn)
      .await?;
    Ok(())
  }

  async fn invalidate_all(&self) -> Result<()> {
    let mut conn = self.conn.clone();
    let keys: Vec<String> =
      redis::cmd("KEYS").arg(LISTING_KEY_PATTERN).query_async(&mut conn).await?;
    if keys.is_empty() {
      return Ok(());
    }
    let _: () = redis::cmd("DEL").arg(&keys).query_async(&mut conn).await?;
    tracing::debug!(removed = keys.len(), "invalidated cached listings");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use roster_core::{
    listing::ListQuery,
    person::{Gender, PersonId},
  };

  use super::*;

  #[tokio::test]
  #[ignore = "requires a running Redis at ROSTER_TEST_REDIS_URL"]
  async fn set_get_and_invalidate_against_live_redis() {
    let url = std::env::var("ROSTER_TEST_REDIS_URL")
      .unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string());
    let cache = RedisCache::connect(&url, Duration::from_secs(60)).await.unwrap();
    let key = ListQuery::default().cache_key();
    let people = vec![Person {
      id:          PersonId(1),
      name:        "Ivan".into(),
      surname:     "Ushakov".into(),
      patronymic:  None,
      age:         30,
      gender:      Gender::Male,
      nationality: "RU".into(),
      created_at:  Utc::now(),
    }];

    cache.set(&key, &people).await.unwrap();
    assert_eq!(cache.get(&key).await.unwrap(), Some(people));

    cache.invalidate_all().await.unwrap();
    assert_eq!(cache.get(&key).await.unwrap(), None);
  }
}
