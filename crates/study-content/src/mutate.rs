//! Validated writes issued by the admin API.
//!
//! Input is checked in full before anything touches the store, so a
//! rejected request never leaves rows behind. Missing parents are created
//! and committed ahead of the row that references them.

use chrono::Utc;
use serde::Deserialize;
use study_core::{
  content::{Category, Chapter, Deck, Entity, Flashcard, Quiz},
  question::{Question, validate_all},
  store::{ContentStore, StoreStats, WriteBatch, WriteOp},
};
use uuid::Uuid;

use crate::{
  ContentService,
  error::{Error, Result, store_err},
};

fn required<'a>(
  value: &'a Option<String>,
  field: &'static str,
) -> Result<&'a str> {
  value
    .as_deref()
    .ok_or(Error::Invalid(study_core::Error::MissingField(field)))
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
  if value.trim().is_empty() {
    return Err(study_core::Error::EmptyField(field).into());
  }
  Ok(value)
}

// ─── Flashcards ──────────────────────────────────────────────────────────────

/// Body of an add-flashcard request. Every field but the category
/// description is required; they are optional here so that a missing one
/// can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewFlashcard {
  pub category_id:          Option<String>,
  pub category_name:        Option<String>,
  #[serde(default)]
  pub category_description: Option<String>,
  pub chapter_id:           Option<String>,
  pub chapter_name:         Option<String>,
  pub deck_id:              Option<String>,
  pub deck_name:            Option<String>,
  pub difficulty:           Option<String>,
  pub question:             Option<String>,
  pub answer:               Option<String>,
}

/// The checked form of [`NewFlashcard`].
struct FlashcardPlan {
  category:  Category,
  chapter:   Chapter,
  deck:      Deck,
  flashcard: Flashcard,
}

impl NewFlashcard {
  fn plan(&self) -> Result<FlashcardPlan> {
    let category_id = required(&self.category_id, "category_id")?;
    let category_name = required(&self.category_name, "category_name")?;
    let chapter_id = required(&self.chapter_id, "chapter_id")?;
    let chapter_name = required(&self.chapter_name, "chapter_name")?;
    let deck_id = required(&self.deck_id, "deck_id")?;
    let deck_name = required(&self.deck_name, "deck_name")?;
    let difficulty = required(&self.difficulty, "difficulty")?;
    let question = required(&self.question, "question")?;
    let answer = required(&self.answer, "answer")?;

    let question = non_empty(question, "question")?;
    let answer = non_empty(answer, "answer")?;

    Ok(FlashcardPlan {
      category:  Category {
        id:          category_id.to_owned(),
        name:        category_name.to_owned(),
        description: self.category_description.clone().unwrap_or_default(),
      },
      chapter:   Chapter {
        id:          chapter_id.to_owned(),
        name:        chapter_name.to_owned(),
        category_id: category_id.to_owned(),
      },
      deck:      Deck {
        id:         deck_id.to_owned(),
        name:       deck_name.to_owned(),
        difficulty: difficulty.to_owned(),
        chapter_id: chapter_id.to_owned(),
      },
      flashcard: Flashcard {
        id:         Uuid::new_v4().to_string(),
        question:   question.to_owned(),
        answer:     answer.to_owned(),
        deck_id:    deck_id.to_owned(),
        created_at: Utc::now(),
      },
    })
  }
}

/// Body of an update-flashcard request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashcardEdit {
  pub question: Option<String>,
  pub answer:   Option<String>,
}

// ─── Quizzes ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuiz {
  pub title:              Option<String>,
  #[serde(default)]
  pub description:        String,
  pub category_id:        Option<String>,
  pub difficulty:         Option<String>,
  #[serde(default)]
  pub time_limit_minutes: u32,
  pub questions:          Option<Vec<Question>>,
}

impl NewQuiz {
  fn into_quiz(self) -> Result<Quiz> {
    let title = required(&self.title, "title")?.to_owned();
    let category_id = required(&self.category_id, "category_id")?.to_owned();
    let difficulty = required(&self.difficulty, "difficulty")?.to_owned();
    let questions = self
      .questions
      .ok_or(Error::Invalid(study_core::Error::MissingField("questions")))?;
    validate_all(&questions)?;

    Ok(Quiz {
      id: Uuid::new_v4().to_string(),
      title,
      description: self.description,
      category_id,
      difficulty,
      time_limit_minutes: self.time_limit_minutes,
      questions,
      created_at: Some(Utc::now()),
    })
  }
}

/// A partial quiz update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizPatch {
  pub title:              Option<String>,
  pub description:        Option<String>,
  pub category_id:        Option<String>,
  pub difficulty:         Option<String>,
  pub time_limit_minutes: Option<u32>,
  pub questions:          Option<Vec<Question>>,
}

impl QuizPatch {
  fn validate(&self) -> Result<()> {
    if let Some(questions) = &self.questions {
      validate_all(questions)?;
    }
    Ok(())
  }

  fn apply_to(self, quiz: &mut Quiz) {
    if let Some(v) = self.title {
      quiz.title = v;
    }
    if let Some(v) = self.description {
      quiz.description = v;
    }
    if let Some(v) = self.category_id {
      quiz.category_id = v;
    }
    if let Some(v) = self.difficulty {
      quiz.difficulty = v;
    }
    if let Some(v) = self.time_limit_minutes {
      quiz.time_limit_minutes = v;
    }
    if let Some(v) = self.questions {
      quiz.questions = v;
    }
  }
}

// ─── Operations ──────────────────────────────────────────────────────────────

impl<S: ContentStore> ContentService<S> {
  /// Add one card, creating its category, chapter and deck on first use.
  /// Returns the new card's id.
  pub async fn add_flashcard(&self, input: NewFlashcard) -> Result<String> {
    let plan = input.plan()?;

    let mut parents = WriteBatch::new();
    let category_id = &plan.category.id;
    if self.store.get_category(category_id).await.map_err(store_err)?.is_none() {
      tracing::info!(%category_id, "creating category");
      parents.push(WriteOp::Category(plan.category.clone()));
    }
    let existing = self
      .store
      .get_chapter(&plan.chapter.id, category_id)
      .await
      .map_err(store_err)?;
    if existing.is_none() {
      tracing::info!(chapter_id = %plan.chapter.id, "creating chapter");
      parents.push(WriteOp::Chapter(plan.chapter.clone()));
    }
    let existing = self
      .store
      .get_deck(&plan.deck.id, &plan.chapter.id)
      .await
      .map_err(store_err)?;
    if existing.is_none() {
      tracing::info!(deck_id = %plan.deck.id, "creating deck");
      parents.push(WriteOp::Deck(plan.deck.clone()));
    }
    if !parents.is_empty() {
      self.store.apply(parents).await.map_err(store_err)?;
    }

    let id = plan.flashcard.id.clone();
    self
      .store
      .apply(WriteOp::Flashcard(plan.flashcard).into())
      .await
      .map_err(store_err)?;
    tracing::info!(card_id = %id, "added flashcard");
    Ok(id)
  }

  /// Replace a card's question and answer.
  pub async fn update_flashcard(&self, id: &str, edit: FlashcardEdit) -> Result<()> {
    let question = non_empty(required(&edit.question, "question")?, "question")?;
    let answer = non_empty(required(&edit.answer, "answer")?, "answer")?;

    let updated = self
      .store
      .update_flashcard(id.to_owned(), question.to_owned(), answer.to_owned())
      .await
      .map_err(store_err)?;
    if !updated {
      return Err(Error::not_found(Entity::Flashcard, id));
    }
    tracing::info!(card_id = id, "updated flashcard");
    Ok(())
  }

  /// Delete one row of `entity` and everything beneath it.
  pub async fn delete(&self, entity: Entity, id: &str) -> Result<()> {
    let deleted = self
      .store
      .delete(entity, id.to_owned())
      .await
      .map_err(store_err)?;
    if !deleted {
      return Err(Error::not_found(entity, id));
    }
    tracing::info!(%entity, id, "deleted");
    Ok(())
  }

  /// Make sure `category_id` exists, creating a placeholder if it does not.
  async fn ensure_quiz_category(&self, category_id: &str) -> Result<()> {
    if self.store.get_category(category_id).await.map_err(store_err)?.is_some() {
      return Ok(());
    }
    let placeholder = Category {
      id:          category_id.to_owned(),
      name:        format!("Quiz Category: {category_id}"),
      description: "Auto-created for quiz".to_owned(),
    };
    self
      .store
      .apply(WriteOp::Category(placeholder).into())
      .await
      .map_err(store_err)?;
    tracing::info!(%category_id, "created quiz category");
    Ok(())
  }

  /// Add a quiz. Returns the new quiz's id.
  pub async fn add_quiz(&self, input: NewQuiz) -> Result<String> {
    let quiz = input.into_quiz()?;
    self.ensure_quiz_category(&quiz.category_id).await?;

    let id = quiz.id.clone();
    self
      .store
      .apply(WriteOp::Quiz(quiz).into())
      .await
      .map_err(store_err)?;
    tracing::info!(quiz_id = %id, "added quiz");
    Ok(id)
  }

  pub async fn update_quiz(&self, id: &str, patch: QuizPatch) -> Result<()> {
    patch.validate()?;

    let mut quiz = self
      .store
      .get_quiz(id)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::not_found(Entity::Quiz, id))?;
    patch.apply_to(&mut quiz);
    self.ensure_quiz_category(&quiz.category_id).await?;

    let updated = self.store.update_quiz(quiz).await.map_err(store_err)?;
    if !updated {
      return Err(Error::not_found(Entity::Quiz, id));
    }
    tracing::info!(quiz_id = id, "updated quiz");
    Ok(())
  }

  pub async fn delete_quiz(&self, id: &str) -> Result<()> {
    self.delete(Entity::Quiz, id).await
  }

  // ── Catalog ───────────────────────────────────────────────────────────

  pub async fn categories(&self) -> Result<Vec<Category>> {
    self.store.list_categories().await.map_err(store_err)
  }

  pub async fn chapters(&self) -> Result<Vec<Chapter>> {
    self.store.list_chapters().await.map_err(store_err)
  }

  pub async fn decks(&self) -> Result<Vec<Deck>> {
    self.store.list_decks().await.map_err(store_err)
  }

  pub async fn stats(&self) -> Result<StoreStats> {
    self.store.stats().await.map_err(store_err)
  }
}
