//! HTTP surfaces for Roster: a JSON REST API and a GraphQL endpoint.
//!
//! Both are thin adapters over one [`People`] service and one [`Validator`].
//! Transport concerns such as TLS and tracing middleware are the caller's.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = roster_api::router(AppState::new(service, validator));
//! ```

pub mod error;
pub mod graphql;
pub mod people;
pub mod rest;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use roster_core::Validator;

pub use error::ApiError;
pub use people::People;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared by every REST handler and GraphQL resolver.
#[derive(Clone)]
pub struct AppState {
  pub people:    Arc<dyn People>,
  pub validator: Arc<Validator>,
}

impl AppState {
  pub fn new(people: impl People + 'static, validator: Arc<Validator>) -> Self {
    Self { people: Arc::new(people), validator }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The REST routes alone, relative to `/api`.
pub fn api_router(state: AppState) -> Router<()> {
  Router::new()
    .route("/people/get", get(rest::list))
    .route("/person/{id}", get(rest::get_one))
    .route("/person/create", post(rest::create))
    .route("/person/update/{id}", put(rest::update))
    .route("/person/delete/{id}", delete(rest::delete))
    .with_state(state)
}

/// REST under `/api`, GraphQL at `/query`, GraphiQL at `/playground`.
pub fn router(state: AppState) -> Router<()> {
  let schema = graphql::schema(state.clone());
  Router::new()
    .nest("/api", api_router(state))
    .route("/playground", get(graphql::playground))
    .route("/query", post(graphql::graphql_handler).with_state(schema))
}
