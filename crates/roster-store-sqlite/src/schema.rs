//! SQL schema for the Roster SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS people (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    surname     TEXT    NOT NULL,
    patronymic  TEXT,
    age         INTEGER NOT NULL CHECK (age BETWEEN 0 AND 255),
    gender      TEXT    NOT NULL,   -- 'male' | 'female'
    nationality TEXT    NOT NULL,
    created_at  TEXT    NOT NULL    -- RFC 3339 UTC, fixed width; server-assigned
);

CREATE INDEX IF NOT EXISTS people_created_idx     ON people(created_at);
CREATE INDEX IF NOT EXISTS people_age_idx         ON people(age);
CREATE INDEX IF NOT EXISTS people_gender_idx      ON people(gender);
CREATE INDEX IF NOT EXISTS people_nationality_idx ON people(nationality);

PRAGMA user_version = 1;
";

/// Column list shared by every `SELECT` so [`RawPerson`](crate::encode::RawPerson)
/// can be read positionally.
pub const PERSON_COLUMNS: &str =
  "id, name, surname, patronymic, age, gender, nationality, created_at";
