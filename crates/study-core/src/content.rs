//! Content entities: the records stored in the relational store.
//!
//! The hierarchy is category → chapter → deck → flashcard. Quizzes hang
//! directly off a category. Every record is keyed by a string identifier;
//! identifiers either come from legacy data or are generated UUIDs.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::question::Question;

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// The two content collections that have both a database and a legacy JSON
/// representation.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
  Flashcards,
  Quizzes,
}

/// A table in the relational store. Used to address deletes and to name the
/// entity in not-found messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Entity {
  Category,
  Chapter,
  Deck,
  Flashcard,
  Quiz,
}

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// An id as written in the legacy JSON files: usually a string, sometimes a
/// bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyId {
  Text(String),
  Number(serde_json::Number),
}

impl fmt::Display for LegacyId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) => f.write_str(s),
      Self::Number(n) => write!(f, "{n}"),
    }
  }
}

impl From<&str> for LegacyId {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id:          String,
  pub name:        String,
  #[serde(default)]
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
  pub id:          String,
  pub name:        String,
  pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
  pub id:         String,
  pub name:       String,
  /// Free-form level label, e.g. "beginner" or "easy". Compared by equality.
  pub difficulty: String,
  pub chapter_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
  pub id:         String,
  pub question:   String,
  pub answer:     String,
  pub deck_id:    String,
  pub created_at: DateTime<Utc>,
}

// ─── Quizzes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
  pub id:                 String,
  pub title:              String,
  #[serde(default)]
  pub description:        String,
  pub category_id:        String,
  pub difficulty:         String,
  /// Zero means untimed.
  #[serde(default)]
  pub time_limit_minutes: u32,
  #[serde(default)]
  pub questions:          Vec<Question>,
  /// `None` only for legacy records that never carried a timestamp.
  #[serde(default)]
  pub created_at:         Option<DateTime<Utc>>,
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Parse a timestamp as written by the legacy JSON files.
///
/// Accepts RFC 3339, naive ISO-8601 date-times (assumed UTC) with either a
/// `T` or a space separator, and bare dates. Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
  let s = s.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Some(dt.with_timezone(&Utc));
  }
  for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
      return Some(naive.and_utc());
    }
  }
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use chrono::{Datelike, Timelike};

  use super::*;

  #[test]
  fn content_kind_parses_lowercase() {
    assert_eq!(ContentKind::from_str("quizzes").unwrap(), ContentKind::Quizzes);
    assert_eq!(ContentKind::Flashcards.to_string(), "flashcards");
    assert!(ContentKind::from_str("demos").is_err());
  }

  #[test]
  fn parses_python_isoformat() {
    let dt = parse_timestamp("2024-03-05T14:30:15.123456").unwrap();
    assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 5));
    assert_eq!((dt.hour(), dt.minute(), dt.second()), (14, 30, 15));
  }

  #[test]
  fn parses_rfc3339_with_offset() {
    let dt = parse_timestamp("2024-03-05T14:30:00+02:00").unwrap();
    assert_eq!(dt.hour(), 12);
  }

  #[test]
  fn parses_space_separated_and_bare_dates() {
    assert!(parse_timestamp("2024-03-05 14:30:00").is_some());
    let d = parse_timestamp("2024-03-05").unwrap();
    assert_eq!(d.hour(), 0);
  }

  #[test]
  fn rejects_garbage() {
    assert!(parse_timestamp("yesterday").is_none());
    assert!(parse_timestamp("").is_none());
  }
}
