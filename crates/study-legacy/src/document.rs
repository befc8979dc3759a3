//! Typed shapes of the legacy JSON documents.
//!
//! Parsing is lenient where the historical files were: optional fields
//! default, card ids may be strings or numbers, and timestamps are kept as
//! the raw strings they were written as.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use study_core::{
  content::{
    Category, Chapter, Deck, Flashcard, LegacyId, Quiz, parse_timestamp,
  },
  question::Question,
};

// ─── flashcards.json ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashcardDocument {
  #[serde(default)]
  pub categories: Vec<LegacyCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyCategory {
  pub id:          String,
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub chapters:    Vec<LegacyChapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyChapter {
  pub id:    String,
  pub name:  String,
  #[serde(default)]
  pub decks: Vec<LegacyDeck>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyDeck {
  pub id:         String,
  pub name:       String,
  pub difficulty: String,
  #[serde(default)]
  pub cards:      Vec<LegacyCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyCard {
  #[serde(default)]
  pub id:         Option<LegacyId>,
  pub question:   String,
  pub answer:     String,
  #[serde(default)]
  pub created_at: Option<String>,
}

impl LegacyCategory {
  pub fn to_category(&self) -> Category {
    Category {
      id:          self.id.clone(),
      name:        self.name.clone(),
      description: self.description.clone(),
    }
  }
}

impl LegacyChapter {
  pub fn to_chapter(&self, category_id: &str) -> Chapter {
    Chapter {
      id:          self.id.clone(),
      name:        self.name.clone(),
      category_id: category_id.to_owned(),
    }
  }
}

impl LegacyDeck {
  pub fn to_deck(&self, chapter_id: &str) -> Deck {
    Deck {
      id:         self.id.clone(),
      name:       self.name.clone(),
      difficulty: self.difficulty.clone(),
      chapter_id: chapter_id.to_owned(),
    }
  }
}

impl LegacyCard {
  /// The database id for the card at `position` (0-based) in `deck_id`.
  ///
  /// Stable across runs so re-migrating recognises cards already imported.
  pub fn composite_id(&self, deck_id: &str, position: usize) -> String {
    match &self.id {
      Some(id) => format!("{deck_id}_{id}"),
      None => format!("{deck_id}_card{}", position + 1),
    }
  }

  /// Build the stored card. A missing or unparseable timestamp becomes `now`.
  pub fn to_flashcard(
    &self,
    deck_id: &str,
    position: usize,
    now: DateTime<Utc>,
  ) -> Flashcard {
    Flashcard {
      id:         self.composite_id(deck_id, position),
      question:   self.question.clone(),
      answer:     self.answer.clone(),
      deck_id:    deck_id.to_owned(),
      created_at: self
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(now),
    }
  }
}

// ─── quizzes.json ────────────────────────────────────────────────────────────

/// `quizzes` is optional so that a document without the key can be told
/// apart from one with an empty list. Entries stay raw until
/// [`QuizDocument::entries`] so that one bad quiz does not sink the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizDocument {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quizzes: Option<Vec<serde_json::Value>>,
}

impl QuizDocument {
  /// The quizzes that parse, or `None` when the key is missing. Entries that
  /// do not parse are logged and skipped.
  pub fn entries(&self) -> Option<Vec<LegacyQuiz>> {
    let raw = self.quizzes.as_ref()?;
    Some(
      raw
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
          match LegacyQuiz::deserialize(value) {
            Ok(quiz) => Some(quiz),
            Err(e) => {
              let id = value.get("id").map(ToString::to_string);
              tracing::warn!(index, ?id, "skipping unreadable quiz: {e}");
              None
            }
          }
        })
        .collect(),
    )
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyQuiz {
  pub id:                 String,
  pub title:              String,
  #[serde(default)]
  pub description:        String,
  pub category_id:        String,
  pub difficulty:         String,
  #[serde(default)]
  pub time_limit_minutes: u32,
  #[serde(default)]
  pub questions:          Vec<Question>,
  #[serde(default)]
  pub created_at:         Option<String>,
}

impl LegacyQuiz {
  /// The quiz as served from the fallback path. An unparseable timestamp is
  /// reported as absent.
  pub fn to_quiz(&self) -> Quiz {
    Quiz {
      id:                 self.id.clone(),
      title:              self.title.clone(),
      description:        self.description.clone(),
      category_id:        self.category_id.clone(),
      difficulty:         self.difficulty.clone(),
      time_limit_minutes: self.time_limit_minutes,
      questions:          self.questions.clone(),
      created_at:         self.created_at.as_deref().and_then(parse_timestamp),
    }
  }

  /// The quiz as written by migration: the timestamp always gets a value.
  pub fn to_stored_quiz(&self, now: DateTime<Utc>) -> Quiz {
    let mut quiz = self.to_quiz();
    quiz.created_at = quiz.created_at.or(Some(now));
    quiz
  }
}

// ─── demos.json ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DemoDocument {
  #[serde(default)]
  pub demos: Vec<Demo>,
  /// Keys this crate does not know about, preserved on rewrite.
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An interactive demo. Demos only ever live in `demos.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demo {
  pub id:           String,
  pub title:        String,
  #[serde(default)]
  pub description:  String,
  pub category_id:  String,
  #[serde(default)]
  pub html_content: String,
  #[serde(default)]
  pub js_content:   String,
  #[serde(default)]
  pub created_at:   String,
  #[serde(flatten)]
  pub extra:        serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  #[test]
  fn composite_ids_use_card_id_or_position() {
    let doc: FlashcardDocument = serde_json::from_value(json!({
      "categories": [{
        "id": "hvac-101", "name": "HVAC 101",
        "chapters": [{
          "id": "ch1", "name": "Intro",
          "decks": [{
            "id": "deck1", "name": "Basics", "difficulty": "beginner",
            "cards": [
              { "id": "abc", "question": "Q1", "answer": "A1" },
              { "id": 7, "question": "Q2", "answer": "A2" },
              { "question": "Q3", "answer": "A3" }
            ]
          }]
        }]
      }]
    }))
    .unwrap();

    let deck = &doc.categories[0].chapters[0].decks[0];
    let ids: Vec<String> = deck
      .cards
      .iter()
      .enumerate()
      .map(|(i, c)| c.composite_id(&deck.id, i))
      .collect();
    assert_eq!(ids, ["deck1_abc", "deck1_7", "deck1_card3"]);
    assert_eq!(doc.categories[0].description, "");
  }

  #[test]
  fn card_timestamp_falls_back_to_now() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let card = LegacyCard {
      id:         None,
      question:   "q".into(),
      answer:     "a".into(),
      created_at: Some("not a date".into()),
    };
    assert_eq!(card.to_flashcard("d", 0, now).created_at, now);

    let dated = LegacyCard { created_at: Some("2023-06-01T10:00:00".into()), ..card };
    assert_eq!(
      dated.to_flashcard("d", 0, now).created_at,
      Utc.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap()
    );
  }

  #[test]
  fn quiz_document_distinguishes_missing_key() {
    let missing: QuizDocument = serde_json::from_value(json!({})).unwrap();
    assert!(missing.entries().is_none());
    let empty: QuizDocument = serde_json::from_value(json!({ "quizzes": [] })).unwrap();
    assert_eq!(empty.entries().map(|q| q.len()), Some(0));
  }

  #[test]
  fn unreadable_quiz_entries_are_skipped() {
    let doc: QuizDocument = serde_json::from_value(json!({
      "quizzes": [
        { "id": "no-difficulty", "title": "T", "category_id": "c" },
        { "id": "essay", "title": "T", "category_id": "c", "difficulty": "easy",
          "questions": [{ "type": "essay", "text": "Discuss." }] },
        { "id": "numbered", "title": "T", "category_id": "c", "difficulty": "easy",
          "questions": [{ "id": 1, "text": "Q", "answers": [{ "text": "A", "correct": true }] }] },
        "not an object"
      ]
    }))
    .unwrap();

    let ids: Vec<String> = doc.entries().unwrap().into_iter().map(|q| q.id).collect();
    assert_eq!(ids, ["numbered"]);
  }

  #[test]
  fn legacy_quiz_conversion() {
    let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let lq: LegacyQuiz = serde_json::from_value(json!({
      "id": "quiz-1",
      "title": "Refrigeration basics",
      "category_id": "hvac-101",
      "difficulty": "easy",
      "questions": [
        { "text": "R-22 is an HCFC.", "answers": [{ "text": "True", "correct": true }] }
      ]
    }))
    .unwrap();

    let served = lq.to_quiz();
    assert!(served.created_at.is_none());
    assert_eq!(served.time_limit_minutes, 0);
    assert_eq!(served.questions.len(), 1);

    assert_eq!(lq.to_stored_quiz(now).created_at, Some(now));
  }

  #[test]
  fn demo_document_keeps_unknown_keys() {
    let doc: DemoDocument = serde_json::from_value(json!({
      "version": 2,
      "demos": [{
        "id": "d1", "title": "Airflow", "category_id": "hvac",
        "thumbnail": "airflow.png"
      }]
    }))
    .unwrap();
    let back = serde_json::to_value(&doc).unwrap();
    assert_eq!(back["version"], 2);
    assert_eq!(back["demos"][0]["thumbnail"], "airflow.png");
  }
}
