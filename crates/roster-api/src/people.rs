//! [`People`]: an object-safe view of [`PeopleService`] so handlers and
//! resolvers can share one `Arc<dyn People>` regardless of backend types.

use async_trait::async_trait;
use roster_core::{
  NewPerson, PeopleService, Person, PersonId, ServiceError, cache::ListingCache,
  listing::ListQuery, store::PersonStore,
};

#[async_trait]
pub trait People: Send + Sync {
  async fn create(&self, person: NewPerson) -> Result<Person, ServiceError>;

  async fn get(&self, id: PersonId) -> Result<Person, ServiceError>;

  async fn update(&self, id: PersonId, person: NewPerson) -> Result<Person, ServiceError>;

  async fn delete(&self, id: PersonId) -> Result<(), ServiceError>;

  async fn list(&self, query: ListQuery) -> Result<Vec<Person>, ServiceError>;
}

#[async_trait]
impl<S, C> People for PeopleService<S, C>
where
  S: PersonStore + 'static,
  C: ListingCache + 'static,
{
  async fn create(&self, person: NewPerson) -> Result<Person, ServiceError> {
    PeopleService::create(self, person).await
  }

  async fn get(&self, id: PersonId) -> Result<Person, ServiceError> {
    PeopleService::get(self, id).await
  }

  async fn update(&self, id: PersonId, person: NewPerson) -> Result<Person, ServiceError> {
    PeopleService::update(self, id, person).await
  }

  async fn delete(&self, id: PersonId) -> Result<(), ServiceError> {
    PeopleService::delete(self, id).await
  }

  async fn list(&self, query: ListQuery) -> Result<Vec<Person>, ServiceError> {
    PeopleService::list(self, query).await
  }
}
