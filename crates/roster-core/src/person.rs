//! Person records: the unvalidated draft, the validated input, and the
//! persisted row.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned identity. Never changes once assigned.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
  Male,
  Female,
}

impl Gender {
  /// Every accepted wire value, in declaration order.
  pub const ALLOWED: &'static [&'static str] = &["male", "female"];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Male => "male",
      Self::Female => "female",
    }
  }

  /// Exact, case-sensitive match against [`Gender::ALLOWED`].
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "male" => Some(Self::Male),
      "female" => Some(Self::Female),
      _ => None,
    }
  }
}

impl fmt::Display for Gender {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// An in-memory, not-yet-validated person record.
///
/// Built either from a queue message (name fields only, enrichment fills the
/// rest) or from a client request body. Missing JSON fields decode to their
/// zero value so that the validator, not the decoder, reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonDraft {
  pub name:        String,
  pub surname:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub patronymic:  Option<String>,
  pub age:         i64,
  pub gender:      String,
  pub nationality: String,
}

impl PersonDraft {
  /// A draft carrying only a given name, as delivered by the queue.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// A validated record ready to be written to a
/// [`PersonStore`](crate::store::PersonStore).
///
/// Only [`Validator::validate`](crate::validate::Validator::validate) builds
/// one, so every store write has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  pub(crate) name:        String,
  pub(crate) surname:     String,
  pub(crate) patronymic:  Option<String>,
  pub(crate) age:         u8,
  pub(crate) gender:      Gender,
  pub(crate) nationality: String,
}

impl NewPerson {
  pub fn name(&self) -> &str { &self.name }

  pub fn surname(&self) -> &str { &self.surname }

  pub fn patronymic(&self) -> Option<&str> { self.patronymic.as_deref() }

  pub fn age(&self) -> u8 { self.age }

  pub fn gender(&self) -> Gender { self.gender }

  pub fn nationality(&self) -> &str { &self.nationality }

  /// Attach store-assigned metadata.
  pub fn into_person(self, id: PersonId, created_at: DateTime<Utc>) -> Person {
    Person {
      id,
      name: self.name,
      surname: self.surname,
      patronymic: self.patronymic,
      age: self.age,
      gender: self.gender,
      nationality: self.nationality,
      created_at,
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A persisted person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          PersonId,
  pub name:        String,
  pub surname:     String,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub patronymic:  Option<String>,
  pub age:         u8,
  pub gender:      Gender,
  pub nationality: String,
  /// Server-assigned; drives the `date` sort.
  pub created_at:  DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn draft_missing_fields_decode_to_zero_values() {
    let draft: PersonDraft = serde_json::from_str(r#"{"name":"Ivan"}"#).unwrap();
    assert_eq!(draft, PersonDraft::named("Ivan"));
    assert_eq!(draft.age, 0);
    assert!(draft.patronymic.is_none());
  }

  #[test]
  fn draft_wrong_type_is_a_decode_error() {
    assert!(serde_json::from_str::<PersonDraft>(r#"{"name":5}"#).is_err());
  }

  #[test]
  fn gender_parse_is_exact() {
    assert_eq!(Gender::parse("male"), Some(Gender::Male));
    assert_eq!(Gender::parse("female"), Some(Gender::Female));
    assert_eq!(Gender::parse("Male"), None);
    assert_eq!(Gender::parse(""), None);
  }

  #[test]
  fn person_serialises_without_absent_patronymic() {
    let person = Person {
      id:          PersonId(7),
      name:        "Ivan".into(),
      surname:     "Ushakov".into(),
      patronymic:  None,
      age:         30,
      gender:      Gender::Male,
      nationality: "RU".into(),
      created_at:  Utc::now(),
    };
    let json = serde_json::to_value(&person).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["gender"], "male");
    assert!(json.get("patronymic").is_none());
  }
}
