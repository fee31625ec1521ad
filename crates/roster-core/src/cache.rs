//! The `ListingCache` trait: cache-aside storage for listing pages.
//!
//! Entries are keyed by [`ListingKey`]. Any write to the store invalidates
//! the whole listing namespace; there is no per-key invalidation.

use std::future::Future;

use crate::{listing::ListingKey, person::Person};

pub trait ListingCache: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Returns `None` on a miss.
  fn get<'a>(
    &'a self,
    key: &'a ListingKey,
  ) -> impl Future<Output = Result<Option<Vec<Person>>, Self::Error>> + Send + 'a;

  /// Store a listing under `key` with the cache's fixed TTL.
  fn set<'a>(
    &'a self,
    key: &'a ListingKey,
    people: &'a [Person],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Drop every cached listing.
  fn invalidate_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
