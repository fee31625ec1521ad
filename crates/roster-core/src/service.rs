//! [`PeopleService`]: the CRUD contract shared by the HTTP surfaces and the
//! ingestion pipeline.
//!
//! Writes and existence checks go straight to the store. Listings are read
//! cache-aside. Every successful write invalidates the whole listing cache.
//! Cache failures are logged and never surface to the caller; a stale entry
//! is bounded by the cache TTL.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
  cache::ListingCache,
  error::{Result, ServiceError},
  listing::ListQuery,
  person::{NewPerson, Person, PersonId},
  store::PersonStore,
};

pub struct PeopleService<S, C> {
  store: Arc<S>,
  cache: Arc<C>,
}

impl<S, C> Clone for PeopleService<S, C> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), cache: Arc::clone(&self.cache) }
  }
}

impl<S, C> PeopleService<S, C>
where
  S: PersonStore,
  C: ListingCache,
{
  pub fn new(store: Arc<S>, cache: Arc<C>) -> Self { Self { store, cache } }

  pub fn store(&self) -> &S { &self.store }

  pub fn cache(&self) -> &C { &self.cache }

  pub async fn create(&self, person: NewPerson) -> Result<Person> {
    let person = self.store.create(person).await.map_err(ServiceError::store)?;
    self.invalidate().await;
    Ok(person)
  }

  pub async fn get(&self, id: PersonId) -> Result<Person> {
    self
      .store
      .get(id)
      .await
      .map_err(ServiceError::store)?
      .ok_or(ServiceError::NotFound(id))
  }

  pub async fn update(&self, id: PersonId, person: NewPerson) -> Result<Person> {
    self.ensure_exists(id).await?;
    let person = self
      .store
      .update(id, person)
      .await
      .map_err(ServiceError::store)?
      .ok_or(ServiceError::NotFound(id))?;
    self.invalidate().await;
    Ok(person)
  }

  pub async fn delete(&self, id: PersonId) -> Result<()> {
    self.ensure_exists(id).await?;
    if !self.store.delete(id).await.map_err(ServiceError::store)? {
      return Err(ServiceError::NotFound(id));
    }
    self.invalidate().await;
    Ok(())
  }

  /// Cache-aside read: a hit is returned as-is, a miss (or a cache error)
  /// falls through to the store and writes the result back.
  pub async fn list(&self, query: ListQuery) -> Result<Vec<Person>> {
    let key = query.cache_key();
    match self.cache.get(&key).await {
      Ok(Some(people)) => {
        debug!(%key, "listing cache hit");
        return Ok(people);
      }
      Ok(None) => debug!(%key, "listing cache miss"),
      Err(e) => warn!(%key, error = %e, "listing cache read failed"),
    }

    let people = self.store.list(&query).await.map_err(ServiceError::store)?;

    if let Err(e) = self.cache.set(&key, &people).await {
      warn!(%key, error = %e, "listing cache write failed");
    }
    Ok(people)
  }

  async fn ensure_exists(&self, id: PersonId) -> Result<()> {
    if self.store.exists(id).await.map_err(ServiceError::store)? {
      Ok(())
    } else {
      Err(ServiceError::NotFound(id))
    }
  }

  async fn invalidate(&self) {
    if let Err(e) = self.cache.invalidate_all().await {
      warn!(error = %e, "listing cache invalidation failed");
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    sync::{
      Mutex,
      atomic::{AtomicBool, AtomicUsize, Ordering},
    },
  };

  use chrono::Utc;

  use super::*;
  use crate::{
    listing::{ListingKey, SortField, SortOrder},
    person::PersonDraft,
    validate::Validator,
  };

  #[derive(Debug, thiserror::Error)]
  #[error("boom")]
  pub struct Boom;

  #[derive(Default)]
  struct VecStore {
    rows:    Mutex<Vec<Person>>,
    lists:   AtomicUsize,
    failing: AtomicBool,
  }

  impl PersonStore for VecStore {
    type Error = Boom;

    async fn create(&self, person: NewPerson) -> Result<Person, Boom> {
      if self.failing.load(Ordering::SeqCst) {
        return Err(Boom);
      }
      let mut rows = self.rows.lock().unwrap();
      let id = PersonId(rows.len() as i64 + 1);
      let person = person.into_person(id, Utc::now());
      rows.push(person.clone());
      Ok(person)
    }

    async fn get(&self, id: PersonId) -> Result<Option<Person>, Boom> {
      Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: PersonId, person: NewPerson) -> Result<Option<Person>, Boom> {
      let mut rows = self.rows.lock().unwrap();
      Ok(rows.iter_mut().find(|p| p.id == id).map(|row| {
        *row = person.into_person(id, row.created_at);
        row.clone()
      }))
    }

    async fn delete(&self, id: PersonId) -> Result<bool, Boom> {
      let mut rows = self.rows.lock().unwrap();
      let before = rows.len();
      rows.retain(|p| p.id != id);
      Ok(rows.len() != before)
    }

    async fn exists(&self, id: PersonId) -> Result<bool, Boom> {
      Ok(self.rows.lock().unwrap().iter().any(|p| p.id == id))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Person>, Boom> {
      self.lists.fetch_add(1, Ordering::SeqCst);
      let rows = self.rows.lock().unwrap();
      Ok(
        rows
          .iter()
          .skip(query.offset() as usize)
          .take(query.limit() as usize)
          .cloned()
          .collect(),
      )
    }
  }

  #[derive(Default)]
  struct MapCache {
    entries:       Mutex<HashMap<ListingKey, Vec<Person>>>,
    invalidations: AtomicUsize,
    broken:        AtomicBool,
  }

  impl ListingCache for MapCache {
    type Error = Boom;

    async fn get(&self, key: &ListingKey) -> Result<Option<Vec<Person>>, Boom> {
      if self.broken.load(Ordering::SeqCst) {
        return Err(Boom);
      }
      Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &ListingKey, people: &[Person]) -> Result<(), Boom> {
      if self.broken.load(Ordering::SeqCst) {
        return Err(Boom);
      }
      self.entries.lock().unwrap().insert(key.clone(), people.to_vec());
      Ok(())
    }

    async fn invalidate_all(&self) -> Result<(), Boom> {
      if self.broken.load(Ordering::SeqCst) {
        return Err(Boom);
      }
      self.invalidations.fetch_add(1, Ordering::SeqCst);
      self.entries.lock().unwrap().clear();
      Ok(())
    }
  }

  fn service() -> PeopleService<VecStore, MapCache> {
    PeopleService::new(Arc::new(VecStore::default()), Arc::new(MapCache::default()))
  }

  fn new_person(name: &str) -> NewPerson {
    let draft = PersonDraft {
      name:        name.into(),
      surname:     "Petrov".into(),
      patronymic:  None,
      age:         40,
      gender:      "female".into(),
      nationality: "RU".into(),
    };
    Validator::default().validate(&draft).unwrap()
  }

  #[tokio::test]
  async fn create_assigns_id_and_invalidates_cache() {
    let svc = service();
    let person = svc.create(new_person("Anna")).await.unwrap();
    assert_eq!(person.id, PersonId(1));
    assert_eq!(svc.cache().invalidations.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn create_store_failure_leaves_cache_untouched() {
    let svc = service();
    svc.store().failing.store(true, Ordering::SeqCst);
    let err = svc.create(new_person("Anna")).await.unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));
    assert_eq!(svc.cache().invalidations.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn list_reads_through_then_hits_cache() {
    let svc = service();
    svc.create(new_person("Anna")).await.unwrap();

    let first = svc.list(ListQuery::default()).await.unwrap();
    let second = svc.list(ListQuery::default()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(svc.store().lists.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn listing_after_create_is_not_stale() {
    let svc = service();
    svc.create(new_person("Anna")).await.unwrap();
    let before = svc.list(ListQuery::default()).await.unwrap();

    svc.create(new_person("Boris")).await.unwrap();
    let after = svc.list(ListQuery::default()).await.unwrap();

    assert_ne!(before, after);
    assert_eq!(after.len(), 2);
  }

  #[tokio::test]
  async fn broken_cache_falls_through_to_store() {
    let svc = service();
    svc.create(new_person("Anna")).await.unwrap();
    svc.cache().broken.store(true, Ordering::SeqCst);

    let people = svc.list(ListQuery::default()).await.unwrap();
    assert_eq!(people.len(), 1);

    // Writes still succeed when invalidation fails.
    svc.create(new_person("Boris")).await.unwrap();
  }

  #[tokio::test]
  async fn update_missing_is_not_found() {
    let svc = service();
    let err = svc.update(PersonId(9), new_person("Anna")).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(PersonId(9))));
    assert_eq!(svc.cache().invalidations.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn update_replaces_fields_and_keeps_identity() {
    let svc = service();
    let created = svc.create(new_person("Anna")).await.unwrap();
    let updated = svc.update(created.id, new_person("Maria")).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Maria");
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(svc.cache().invalidations.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn delete_missing_is_not_found() {
    let svc = service();
    let err = svc.delete(PersonId(3)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(PersonId(3))));
  }

  #[tokio::test]
  async fn delete_removes_record() {
    let svc = service();
    let created = svc.create(new_person("Anna")).await.unwrap();
    svc.delete(created.id).await.unwrap();
    assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound(_))));
  }

  #[tokio::test]
  async fn listings_with_different_shapes_are_cached_separately() {
    let svc = service();
    svc.create(new_person("Anna")).await.unwrap();
    svc.list(ListQuery::default()).await.unwrap();
    svc.list(ListQuery::new(1, 10, SortField::Age, SortOrder::Desc)).await.unwrap();
    assert_eq!(svc.store().lists.load(Ordering::SeqCst), 2);
    assert_eq!(svc.cache().entries.lock().unwrap().len(), 2);
  }
}
