//! Declarative field-constraint checks for [`PersonDraft`].
//!
//! Checks run in a fixed order and stop at the first violation:
//!
//! | Field         | Constraints                                  |
//! |---------------|----------------------------------------------|
//! | `name`        | required, alphabetic, starts upper-case      |
//! | `surname`     | required, alphabetic, starts upper-case      |
//! | `age`         | within [`AgeBounds`] (default `0..=120`)     |
//! | `gender`      | one of [`Gender::ALLOWED`]                   |
//! | `nationality` | alphabetic                                   |
//!
//! `patronymic` is optional and unchecked.

use std::fmt;

use thiserror::Error;

use crate::{
  error::ConfigError,
  person::{Gender, NewPerson, PersonDraft},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// The format rule a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatRule {
  Alphabetic,
  UppercaseStart,
}

impl fmt::Display for FormatRule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Alphabetic => f.write_str("must contain only alpha characters"),
      Self::UppercaseStart => f.write_str("must start with an upper case letter"),
    }
  }
}

/// The first constraint a draft violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("field {field} is required")]
  MissingField { field: &'static str },

  #[error("field {field} {rule}")]
  InvalidFormat { field: &'static str, rule: FormatRule },

  #[error("field {field} must be between {min} and {max}")]
  OutOfRange { field: &'static str, min: i64, max: i64 },

  #[error("field {field} must be one of ({})", .allowed.join(" "))]
  InvalidEnum {
    field:   &'static str,
    allowed: &'static [&'static str],
  },
}

impl ValidationError {
  /// The JSON name of the offending field.
  pub fn field(&self) -> &'static str {
    match self {
      Self::MissingField { field }
      | Self::InvalidFormat { field, .. }
      | Self::OutOfRange { field, .. }
      | Self::InvalidEnum { field, .. } => field,
    }
  }
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Inclusive age range accepted by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBounds {
  pub min: i64,
  pub max: i64,
}

impl Default for AgeBounds {
  fn default() -> Self { Self { min: 0, max: 120 } }
}

// ─── Validator ───────────────────────────────────────────────────────────────

/// Stateless checker; build once and share behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Validator {
  age: AgeBounds,
}

impl Validator {
  pub fn new(age: AgeBounds) -> Result<Self, ConfigError> {
    if age.min > age.max {
      return Err(ConfigError::InvertedAgeBounds { min: age.min, max: age.max });
    }
    for bound in [age.min, age.max] {
      if u8::try_from(bound).is_err() {
        return Err(ConfigError::AgeBoundTooLarge(bound));
      }
    }
    Ok(Self { age })
  }

  pub fn age_bounds(&self) -> AgeBounds { self.age }

  /// Check `draft` and, if it passes, produce the typed record.
  pub fn validate(&self, draft: &PersonDraft) -> Result<NewPerson, ValidationError> {
    check_proper_name("name", &draft.name)?;
    check_proper_name("surname", &draft.surname)?;
    let age = self.check_age(draft.age)?;
    let gender = Gender::parse(&draft.gender).ok_or(ValidationError::InvalidEnum {
      field:   "gender",
      allowed: Gender::ALLOWED,
    })?;
    check_alphabetic("nationality", &draft.nationality)?;

    Ok(NewPerson {
      name: draft.name.clone(),
      surname: draft.surname.clone(),
      patronymic: draft.patronymic.clone().filter(|p| !p.is_empty()),
      age,
      gender,
      nationality: draft.nationality.clone(),
    })
  }

  fn check_age(&self, age: i64) -> Result<u8, ValidationError> {
    let out_of_range = ValidationError::OutOfRange {
      field: "age",
      min:   self.age.min,
      max:   self.age.max,
    };
    if !(self.age.min..=self.age.max).contains(&age) {
      return Err(out_of_range);
    }
    u8::try_from(age).map_err(|_| out_of_range)
  }
}

fn check_proper_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if value.is_empty() {
    return Err(ValidationError::MissingField { field });
  }
  check_alphabetic(field, value)?;
  match value.chars().next() {
    Some(c) if c.is_uppercase() => Ok(()),
    _ => Err(ValidationError::InvalidFormat { field, rule: FormatRule::UppercaseStart }),
  }
}

/// Empty strings are not alphabetic.
fn check_alphabetic(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if !value.is_empty() && value.chars().all(char::is_alphabetic) {
    Ok(())
  } else {
    Err(ValidationError::InvalidFormat { field, rule: FormatRule::Alphabetic })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> PersonDraft {
    PersonDraft {
      name:        "Ivan".into(),
      surname:     "Ushakov".into(),
      patronymic:  Some("Sergeevich".into()),
      age:         30,
      gender:      "male".into(),
      nationality: "RU".into(),
    }
  }

  #[test]
  fn valid_draft_produces_typed_record() {
    let person = Validator::default().validate(&valid()).unwrap();
    assert_eq!(person.name(), "Ivan");
    assert_eq!(person.age(), 30);
    assert_eq!(person.gender(), Gender::Male);
    assert_eq!(person.patronymic(), Some("Sergeevich"));
  }

  #[test]
  fn missing_name_is_reported_before_anything_else() {
    // Every other field is broken too; only the name should be reported.
    let draft = PersonDraft {
      name:        String::new(),
      surname:     "lower".into(),
      patronymic:  None,
      age:         500,
      gender:      "robot".into(),
      nationality: "R2".into(),
    };
    let err = Validator::default().validate(&draft).unwrap_err();
    assert_eq!(err, ValidationError::MissingField { field: "name" });
    assert_eq!(err.to_string(), "field name is required");
  }

  #[test]
  fn lower_case_name_is_invalid_format() {
    let draft = PersonDraft { name: "ivan".into(), ..valid() };
    let err = Validator::default().validate(&draft).unwrap_err();
    assert_eq!(
      err,
      ValidationError::InvalidFormat { field: "name", rule: FormatRule::UppercaseStart }
    );
    assert_eq!(err.to_string(), "field name must start with an upper case letter");
  }

  #[test]
  fn non_alphabetic_surname_is_invalid_format() {
    let draft = PersonDraft { surname: "Ush4kov".into(), ..valid() };
    let err = Validator::default().validate(&draft).unwrap_err();
    assert_eq!(
      err,
      ValidationError::InvalidFormat { field: "surname", rule: FormatRule::Alphabetic }
    );
  }

  #[test]
  fn missing_surname_is_missing_field() {
    let err = Validator::default().validate(&PersonDraft::named("Ivan")).unwrap_err();
    assert_eq!(err, ValidationError::MissingField { field: "surname" });
  }

  #[test]
  fn ages_outside_bounds_are_out_of_range() {
    for age in [-1, 121, 255, 256, i64::MIN, i64::MAX] {
      let draft = PersonDraft { age, ..valid() };
      let err = Validator::default().validate(&draft).unwrap_err();
      assert_eq!(err, ValidationError::OutOfRange { field: "age", min: 0, max: 120 }, "age {age}");
    }
  }

  #[test]
  fn out_of_range_age_wins_over_later_fields() {
    let draft = PersonDraft { age: 200, gender: "x".into(), nationality: "1".into(), ..valid() };
    let err = Validator::default().validate(&draft).unwrap_err();
    assert!(matches!(err, ValidationError::OutOfRange { .. }));
  }

  #[test]
  fn age_bounds_are_inclusive() {
    for age in [0, 120] {
      let draft = PersonDraft { age, ..valid() };
      assert!(Validator::default().validate(&draft).is_ok(), "age {age}");
    }
  }

  #[test]
  fn unknown_gender_is_invalid_enum() {
    let draft = PersonDraft { gender: "Male".into(), ..valid() };
    let err = Validator::default().validate(&draft).unwrap_err();
    assert_eq!(err.field(), "gender");
    assert_eq!(err.to_string(), "field gender must be one of (male female)");
  }

  #[test]
  fn empty_nationality_is_not_alphabetic() {
    let draft = PersonDraft { nationality: String::new(), ..valid() };
    let err = Validator::default().validate(&draft).unwrap_err();
    assert_eq!(
      err,
      ValidationError::InvalidFormat { field: "nationality", rule: FormatRule::Alphabetic }
    );
  }

  #[test]
  fn cyrillic_names_are_alphabetic() {
    let draft = PersonDraft { name: "Иван".into(), surname: "Ушаков".into(), ..valid() };
    assert!(Validator::default().validate(&draft).is_ok());
  }

  #[test]
  fn empty_patronymic_is_dropped() {
    let draft = PersonDraft { patronymic: Some(String::new()), ..valid() };
    let person = Validator::default().validate(&draft).unwrap();
    assert_eq!(person.patronymic(), None);
  }

  #[test]
  fn inverted_bounds_are_a_config_error() {
    let err = Validator::new(AgeBounds { min: 50, max: 10 }).unwrap_err();
    assert_eq!(err, ConfigError::InvertedAgeBounds { min: 50, max: 10 });
  }

  #[test]
  fn bounds_beyond_u8_are_a_config_error() {
    let err = Validator::new(AgeBounds { min: 0, max: 300 }).unwrap_err();
    assert_eq!(err, ConfigError::AgeBoundTooLarge(300));
  }

  #[test]
  fn configured_bounds_are_reported() {
    let bounds = AgeBounds { min: 18, max: 65 };
    assert_eq!(Validator::new(bounds).unwrap().age_bounds(), bounds);
    assert_eq!(Validator::default().age_bounds(), AgeBounds { min: 0, max: 120 });
  }

  #[test]
  fn custom_bounds_are_enforced() {
    let validator = Validator::new(AgeBounds { min: 18, max: 65 }).unwrap();
    let err = validator.validate(&PersonDraft { age: 17, ..valid() }).unwrap_err();
    assert_eq!(err, ValidationError::OutOfRange { field: "age", min: 18, max: 65 });
  }
}
