//! REST handlers, mounted under `/api`.
//!
//! | Method   | Path                     | Notes                                     |
//! |----------|--------------------------|-------------------------------------------|
//! | `GET`    | `/people/get`            | `?page&limit&sortBy&sortOrder`            |
//! | `GET`    | `/person/{id}`           | 404 if not found                          |
//! | `POST`   | `/person/create`         | 201 `{"message":"success"}`               |
//! | `PUT`    | `/person/update/{id}`    | full replacement; 404 if not found        |
//! | `DELETE` | `/person/delete/{id}`    | 404 if not found                          |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
};
use roster_core::{Person, PersonDraft, PersonId, listing::ListQuery};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Body returned by every successful write.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
  pub message: String,
}

fn success() -> Json<Message> { Json(Message { message: "success".to_string() }) }

/// Ids are positive integers; anything else is a bad request.
pub fn parse_id(raw: &str) -> Result<PersonId, ApiError> {
  match raw.parse::<i64>() {
    Ok(id) if id > 0 => Ok(PersonId(id)),
    _ => Err(ApiError::invalid_id()),
  }
}

fn draft_from(body: Result<Json<PersonDraft>, JsonRejection>) -> Result<PersonDraft, ApiError> {
  body
    .map(|Json(draft)| draft)
    .map_err(|e| ApiError::BadRequest(e.body_text()))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// Raw query parameters. Unparseable values fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub page:       Option<String>,
  pub limit:      Option<String>,
  pub sort_by:    Option<String>,
  pub sort_order: Option<String>,
}

impl ListParams {
  pub fn to_query(&self) -> ListQuery {
    ListQuery::from_params(
      self.page.as_deref().and_then(|s| s.parse().ok()),
      self.limit.as_deref().and_then(|s| s.parse().ok()),
      self.sort_by.as_deref(),
      self.sort_order.as_deref(),
    )
  }
}

/// `GET /people/get`
pub async fn list(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let people = state.people.list(params.to_query()).await?;
  Ok(Json(people))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /person/{id}`
pub async fn get_one(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
  let id = parse_id(&id)?;
  Ok(Json(state.people.get(id).await?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /person/create`. The body is a client-supplied full record.
pub async fn create(
  State(state): State<AppState>,
  body: Result<Json<PersonDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
  let person = state.validator.validate(&draft_from(body)?)?;
  state.people.create(person).await?;
  Ok((StatusCode::CREATED, success()))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /person/update/{id}`
pub async fn update(
  State(state): State<AppState>,
  Path(id): Path<String>,
  body: Result<Json<PersonDraft>, JsonRejection>,
) -> Result<Json<Message>, ApiError> {
  let id = parse_id(&id)?;
  let person = state.validator.validate(&draft_from(body)?)?;
  state.people.update(id, person).await?;
  Ok(success())
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /person/delete/{id}`
pub async fn delete(
  State(state): State<AppState>,
  Path(id): Path<String>,
) -> Result<Json<Message>, ApiError> {
  let id = parse_id(&id)?;
  state.people.delete(id).await?;
  Ok(success())
}
