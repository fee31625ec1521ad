//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that ordering by
//! the text column matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use roster_core::{
  listing::{SortField, SortOrder},
  person::{Gender, Person, PersonId},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Gender ──────────────────────────────────────────────────────────────────

pub fn encode_gender(g: Gender) -> &'static str { g.as_str() }

pub fn decode_gender(s: &str) -> Result<Gender> {
  Gender::parse(s).ok_or_else(|| Error::UnknownGender(s.to_owned()))
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

/// Whitelisted column for each sort field; never interpolate user input.
pub fn sort_column(field: SortField) -> &'static str {
  match field {
    SortField::Date => "created_at",
    SortField::Age => "age",
    SortField::Gender => "gender",
    SortField::Nationality => "nationality",
  }
}

pub fn sort_direction(order: SortOrder) -> &'static str {
  match order {
    SortOrder::Asc => "ASC",
    SortOrder::Desc => "DESC",
  }
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A `people` row exactly as read from SQLite, before decoding.
pub struct RawPerson {
  pub id:          i64,
  pub name:        String,
  pub surname:     String,
  pub patronymic:  Option<String>,
  pub age:         i64,
  pub gender:      String,
  pub nationality: String,
  pub created_at:  String,
}

impl RawPerson {
  /// Read a row selected with [`PERSON_COLUMNS`](crate::schema::PERSON_COLUMNS).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      surname:     row.get(2)?,
      patronymic:  row.get(3)?,
      age:         row.get(4)?,
      gender:      row.get(5)?,
      nationality: row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          PersonId(self.id),
      name:        self.name,
      surname:     self.surname,
      patronymic:  self.patronymic,
      age:         u8::try_from(self.age).map_err(|_| Error::AgeOutOfRange(self.age))?,
      gender:      decode_gender(&self.gender)?,
      nationality: self.nationality,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
