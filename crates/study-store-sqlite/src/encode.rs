//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Quiz questions are stored as a
//! compact JSON array.

use chrono::{DateTime, Utc};
use study_core::{
  content::{Category, Chapter, Deck, Entity, Flashcard, Quiz},
  question::{decode_questions, encode_questions},
  store::WriteOp,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Entity ──────────────────────────────────────────────────────────────────

pub fn table_name(entity: Entity) -> &'static str {
  match entity {
    Entity::Category => "categories",
    Entity::Chapter => "chapters",
    Entity::Deck => "decks",
    Entity::Flashcard => "flashcards",
    Entity::Quiz => "quizzes",
  }
}

// ─── Write ops ───────────────────────────────────────────────────────────────

/// Column values for one quiz row, ready to bind.
pub struct QuizRow {
  pub id:                 String,
  pub title:              String,
  pub description:        String,
  pub category_id:        String,
  pub difficulty:         String,
  pub time_limit_minutes: i64,
  pub questions_json:     String,
  pub created_at:         Option<String>,
}

impl QuizRow {
  pub fn encode(quiz: Quiz) -> Result<Self> {
    Ok(Self {
      questions_json:     encode_questions(&quiz.questions)?,
      created_at:         quiz.created_at.map(encode_dt),
      id:                 quiz.id,
      title:              quiz.title,
      description:        quiz.description,
      category_id:        quiz.category_id,
      difficulty:         quiz.difficulty,
      time_limit_minutes: i64::from(quiz.time_limit_minutes),
    })
  }
}

/// A [`WriteOp`] with every fallible encoding already done, so the blocking
/// closure only binds parameters.
pub enum EncodedOp {
  Category(Category),
  Chapter(Chapter),
  Deck(Deck),
  Flashcard {
    id:         String,
    question:   String,
    answer:     String,
    deck_id:    String,
    created_at: String,
  },
  Quiz(QuizRow),
}

impl EncodedOp {
  pub fn encode(op: WriteOp) -> Result<Self> {
    Ok(match op {
      WriteOp::Category(c) => Self::Category(c),
      WriteOp::Chapter(c) => Self::Chapter(c),
      WriteOp::Deck(d) => Self::Deck(d),
      WriteOp::Flashcard(f) => Self::Flashcard {
        created_at: encode_dt(f.created_at),
        id:         f.id,
        question:   f.question,
        answer:     f.answer,
        deck_id:    f.deck_id,
      },
      WriteOp::Quiz(q) => Self::Quiz(QuizRow::encode(q)?),
    })
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `flashcards` row.
pub struct RawFlashcard {
  pub id:         String,
  pub question:   String,
  pub answer:     String,
  pub deck_id:    String,
  pub created_at: String,
}

impl RawFlashcard {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      question:   row.get(1)?,
      answer:     row.get(2)?,
      deck_id:    row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_flashcard(self) -> Result<Flashcard> {
    Ok(Flashcard {
      created_at: decode_dt(&self.created_at)?,
      id:         self.id,
      question:   self.question,
      answer:     self.answer,
      deck_id:    self.deck_id,
    })
  }
}

/// Raw strings read directly from a `quizzes` row.
pub struct RawQuiz {
  pub id:                 String,
  pub title:              String,
  pub description:        String,
  pub category_id:        String,
  pub difficulty:         String,
  pub time_limit_minutes: i64,
  pub questions_json:     String,
  pub created_at:         Option<String>,
}

impl RawQuiz {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                 row.get(0)?,
      title:              row.get(1)?,
      description:        row.get(2)?,
      category_id:        row.get(3)?,
      difficulty:         row.get(4)?,
      time_limit_minutes: row.get(5)?,
      questions_json:     row.get(6)?,
      created_at:         row.get(7)?,
    })
  }

  /// A question column that no longer parses yields an empty question list
  /// rather than failing the whole read.
  pub fn into_quiz(self) -> Result<Quiz> {
    let questions = decode_questions(&self.questions_json).unwrap_or_else(|e| {
      tracing::error!(quiz_id = %self.id, "error deserializing questions: {e}");
      Vec::new()
    });

    Ok(Quiz {
      created_at: self.created_at.as_deref().map(decode_dt).transpose()?,
      time_limit_minutes: u32::try_from(self.time_limit_minutes).unwrap_or(0),
      questions,
      id: self.id,
      title: self.title,
      description: self.description,
      category_id: self.category_id,
      difficulty: self.difficulty,
    })
  }
}

pub fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
  Ok(Category {
    id:          row.get(0)?,
    name:        row.get(1)?,
    description: row.get(2)?,
  })
}

pub fn chapter_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chapter> {
  Ok(Chapter {
    id:          row.get(0)?,
    name:        row.get(1)?,
    category_id: row.get(2)?,
  })
}

pub fn deck_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Deck> {
  Ok(Deck {
    id:         row.get(0)?,
    name:       row.get(1)?,
    difficulty: row.get(2)?,
    chapter_id: row.get(3)?,
  })
}
