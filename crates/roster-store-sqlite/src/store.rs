//! [`SqliteStore`]: the SQLite implementation of [`PersonStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::OptionalExtension as _;
use roster_core::{
  listing::{ListQuery, MAX_PAGE_SIZE},
  person::{NewPerson, Person, PersonId},
  store::PersonStore,
};

use crate::{
  Result,
  encode::{RawPerson, encode_dt, encode_gender, sort_column, sort_direction},
  schema::{PERSON_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A people directory backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Owned column values for an INSERT or UPDATE, ready to move into the
/// connection thread.
struct Columns {
  name:        String,
  surname:     String,
  patronymic:  Option<String>,
  age:         i64,
  gender:      &'static str,
  nationality: String,
}

impl From<&NewPerson> for Columns {
  fn from(p: &NewPerson) -> Self {
    Self {
      name:        p.name().to_owned(),
      surname:     p.surname().to_owned(),
      patronymic:  p.patronymic().map(str::to_owned),
      age:         i64::from(p.age()),
      gender:      encode_gender(p.gender()),
      nationality: p.nationality().to_owned(),
    }
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = crate::Error;

  async fn create(&self, person: NewPerson) -> Result<Person> {
    // Stored with microsecond precision; the returned record must match.
    let created_at = Utc::now().trunc_subsecs(6);
    let at_str     = encode_dt(created_at);
    let cols       = Columns::from(&person);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (name, surname, patronymic, age, gender, nationality, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            cols.name,
            cols.surname,
            cols.patronymic,
            cols.age,
            cols.gender,
            cols.nationality,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted person");
    Ok(person.into_person(PersonId(id), created_at))
  }

  async fn get(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = ?1"),
              rusqlite::params![id.0],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn update(&self, id: PersonId, person: NewPerson) -> Result<Option<Person>> {
    let cols = Columns::from(&person);

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE people
           SET name = ?1, surname = ?2, patronymic = ?3, age = ?4, gender = ?5, nationality = ?6
           WHERE id = ?7",
          rusqlite::params![
            cols.name,
            cols.surname,
            cols.patronymic,
            cols.age,
            cols.gender,
            cols.nationality,
            id.0,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = ?1"),
          rusqlite::params![id.0],
          RawPerson::from_row,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn delete(&self, id: PersonId) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM people WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;
    Ok(removed > 0)
  }

  async fn exists(&self, id: PersonId) -> Result<bool> {
    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT EXISTS (SELECT 1 FROM people WHERE id = ?1)",
          rusqlite::params![id.0],
          |row| row.get::<_, bool>(0),
        )?)
      })
      .await?;
    Ok(exists)
  }

  async fn list(&self, query: &ListQuery) -> Result<Vec<Person>> {
    let limit  = i64::from(query.limit().min(MAX_PAGE_SIZE));
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);
    let sql    = format!(
      "SELECT {PERSON_COLUMNS} FROM people
       ORDER BY {} {}, id ASC
       LIMIT ?1 OFFSET ?2",
      sort_column(query.sort_field()),
      sort_direction(query.sort_order()),
    );

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }
}
