//! Core types and trait definitions for the Roster people directory.
//!
//! This crate is deliberately free of HTTP, queue and database dependencies.
//! Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cache;
pub mod error;
pub mod listing;
pub mod person;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{ConfigError, ServiceError};
pub use person::{Gender, NewPerson, Person, PersonDraft, PersonId};
pub use service::PeopleService;
pub use validate::{ValidationError, Validator};
