//! The `PersonStore` trait: durable CRUD plus an existence check.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). Implementors
//! must be safe for concurrent use; callers share one instance across the
//! HTTP handlers and the ingestion pipeline without extra locking.

use std::future::Future;

use crate::{
  listing::ListQuery,
  person::{NewPerson, Person, PersonId},
};

pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new record. Identity and `created_at` are assigned here.
  fn create(
    &self,
    person: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Fetch one record. Returns `None` if not found.
  fn get(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Replace every mutable field of `id`. Returns `None` if not found.
  /// Identity and `created_at` are preserved.
  fn update(
    &self,
    id: PersonId,
    person: NewPerson,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Remove a record. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn exists(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// One page of records in the requested order. Implementations cap the page
  /// size at [`MAX_PAGE_SIZE`](crate::listing::MAX_PAGE_SIZE) even if handed
  /// a larger limit.
  fn list<'a>(
    &'a self,
    query: &'a ListQuery,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + 'a;
}
