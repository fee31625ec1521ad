//! GraphQL surface over the same [`People`](crate::People) service.
//!
//! - `POST /query`: queries and mutations.
//! - `GET /playground`: GraphiQL.
//!
//! Resolver errors carry the REST error text plus an `extensions.code` of
//! `NOT_FOUND`, `BAD_USER_INPUT` or `INTERNAL`.

use async_graphql::{
  Context, EmptySubscription, ErrorExtensions, InputObject, Object, Result as GqlResult, Schema,
  SimpleObject,
};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};
use roster_core::{Person, PersonDraft, PersonId, listing::ListQuery};

use crate::{AppState, error::ApiError};

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Person")]
pub struct GqlPerson {
  pub id:          i64,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  Option<String>,
  pub age:         i32,
  pub gender:      String,
  pub nationality: String,
  /// RFC 3339.
  pub created_at:  String,
}

impl From<Person> for GqlPerson {
  fn from(p: Person) -> Self {
    Self {
      id:          p.id.0,
      name:        p.name,
      surname:     p.surname,
      patronymic:  p.patronymic,
      age:         i32::from(p.age),
      gender:      p.gender.as_str().to_string(),
      nationality: p.nationality,
      created_at:  p.created_at.to_rfc3339(),
    }
  }
}

/// Full person record; omitted fields are empty and fail validation as in
/// the REST body.
#[derive(Debug, Clone, Default, InputObject)]
pub struct PersonInput {
  #[graphql(default)]
  pub name:        String,
  #[graphql(default)]
  pub surname:     String,
  pub patronymic:  Option<String>,
  #[graphql(default)]
  pub age:         i32,
  #[graphql(default)]
  pub gender:      String,
  #[graphql(default)]
  pub nationality: String,
}

impl From<PersonInput> for PersonDraft {
  fn from(input: PersonInput) -> Self {
    Self {
      name:        input.name,
      surname:     input.surname,
      patronymic:  input.patronymic,
      age:         i64::from(input.age),
      gender:      input.gender,
      nationality: input.nationality,
    }
  }
}

fn gql_error(err: impl Into<ApiError>) -> async_graphql::Error {
  let err = err.into();
  let code = match &err {
    ApiError::NotFound(_) => "NOT_FOUND",
    ApiError::BadRequest(_) => "BAD_USER_INPUT",
    ApiError::Internal(e) => {
      tracing::error!(error = %e, "resolver failed");
      "INTERNAL"
    }
  };
  async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

fn person_id(id: i64) -> GqlResult<PersonId> {
  if id > 0 { Ok(PersonId(id)) } else { Err(gql_error(ApiError::invalid_id())) }
}

// ─── Query root ──────────────────────────────────────────────────────────────

pub struct QueryRoot;

#[Object]
impl QueryRoot {
  /// One page of people. Arguments match the REST listing's query string.
  async fn get_people(
    &self,
    ctx: &Context<'_>,
    page: Option<i32>,
    limit: Option<i32>,
    sort_by: Option<String>,
    sort_order: Option<String>,
  ) -> GqlResult<Vec<GqlPerson>> {
    let state = ctx.data::<AppState>()?;
    let query = ListQuery::from_params(
      page.map(i64::from),
      limit.map(i64::from),
      sort_by.as_deref(),
      sort_order.as_deref(),
    );
    let people = state.people.list(query).await.map_err(gql_error)?;
    Ok(people.into_iter().map(GqlPerson::from).collect())
  }

  async fn get_person(&self, ctx: &Context<'_>, id: i64) -> GqlResult<GqlPerson> {
    let state = ctx.data::<AppState>()?;
    let person = state.people.get(person_id(id)?).await.map_err(gql_error)?;
    Ok(person.into())
  }
}

// ─── Mutation root ───────────────────────────────────────────────────────────

pub struct MutationRoot;

#[Object]
impl MutationRoot {
  async fn create_person(&self, ctx: &Context<'_>, input: PersonInput) -> GqlResult<GqlPerson> {
    let state = ctx.data::<AppState>()?;
    let person = state.validator.validate(&input.into()).map_err(gql_error)?;
    let person = state.people.create(person).await.map_err(gql_error)?;
    Ok(person.into())
  }

  async fn update_person(
    &self,
    ctx: &Context<'_>,
    id: i64,
    input: PersonInput,
  ) -> GqlResult<GqlPerson> {
    let state = ctx.data::<AppState>()?;
    let id = person_id(id)?;
    let person = state.validator.validate(&input.into()).map_err(gql_error)?;
    let person = state.people.update(id, person).await.map_err(gql_error)?;
    Ok(person.into())
  }

  async fn delete_person(&self, ctx: &Context<'_>, id: i64) -> GqlResult<bool> {
    let state = ctx.data::<AppState>()?;
    state.people.delete(person_id(id)?).await.map_err(gql_error)?;
    Ok(true)
  }
}

// ─── Schema & handlers ───────────────────────────────────────────────────────

pub type RosterSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn schema(state: AppState) -> RosterSchema {
  Schema::build(QueryRoot, MutationRoot, EmptySubscription).data(state).finish()
}

/// `POST /query`
pub async fn graphql_handler(
  State(schema): State<RosterSchema>,
  req: GraphQLRequest,
) -> GraphQLResponse {
  schema.execute(req.into_inner()).await.into()
}

/// `GET /playground`
pub async fn playground() -> Html<String> {
  Html(async_graphql::http::GraphiQLSource::build().endpoint("/query").finish())
}

#[cfg(test)]
mod tests {
  use async_graphql::{Request, Variables};
  use serde_json::{Value, json};

  use super::*;
  use crate::tests::sqlite_state;

  async fn run(schema: &RosterSchema, query: &str, vars: Value) -> Value {
    let req = Request::new(query).variables(Variables::from_json(vars));
    serde_json::to_value(schema.execute(req).await).unwrap()
  }

  const CREATE: &str = r#"
    mutation($input: PersonInput!) {
      createPerson(input: $input) { id name age gender nationality }
    }
  "#;

  fn ivan() -> Value {
    json!({
      "name": "Ivan", "surname": "Ivanov", "age": 30,
      "gender": "male", "nationality": "RU"
    })
  }

  #[tokio::test]
  async fn create_then_list() {
    let schema = schema(sqlite_state().await);

    let created = run(&schema, CREATE, json!({ "input": ivan() })).await;
    assert_eq!(created["data"]["createPerson"]["name"], "Ivan");
    assert_eq!(created["data"]["createPerson"]["gender"], "male");

    let listed = run(
      &schema,
      r#"{ getPeople(sortBy: "age", sortOrder: "desc") { name surname age } }"#,
      json!({}),
    )
    .await;
    assert_eq!(listed["data"]["getPeople"], json!([{ "name": "Ivan", "surname": "Ivanov", "age": 30 }]));
  }

  #[tokio::test]
  async fn invalid_input_is_bad_user_input() {
    let schema = schema(sqlite_state().await);
    let mut input = ivan();
    input["name"] = json!("ivan");

    let resp = run(&schema, CREATE, json!({ "input": input })).await;
    let err = &resp["errors"][0];
    assert_eq!(err["message"], "field name must start with an upper case letter");
    assert_eq!(err["extensions"]["code"], "BAD_USER_INPUT");
  }

  #[tokio::test]
  async fn delete_missing_is_not_found() {
    let schema = schema(sqlite_state().await);

    let resp = run(&schema, "mutation { deletePerson(id: 42) }", json!({})).await;
    let err = &resp["errors"][0];
    assert_eq!(err["message"], "person 42 not found");
    assert_eq!(err["extensions"]["code"], "NOT_FOUND");
  }

  #[tokio::test]
  async fn update_replaces_and_delete_returns_true() {
    let schema = schema(sqlite_state().await);
    let created = run(&schema, CREATE, json!({ "input": ivan() })).await;
    let id = created["data"]["createPerson"]["id"].clone();

    let mut input = ivan();
    input["age"] = json!(31);
    let updated = run(
      &schema,
      "mutation($id: Int!, $input: PersonInput!) { updatePerson(id: $id, input: $input) { age } }",
      json!({ "id": id, "input": input }),
    )
    .await;
    assert_eq!(updated["data"]["updatePerson"]["age"], 31);

    let deleted = run(
      &schema,
      "mutation($id: Int!) { deletePerson(id: $id) }",
      json!({ "id": id }),
    )
    .await;
    assert_eq!(deleted["data"]["deletePerson"], true);
  }
}
