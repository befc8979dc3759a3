//! Import of the legacy JSON files into the relational store.
//!
//! A run can be repeated safely. Every entity is looked up by primary key
//! first and written with insert-if-absent semantics, so rows already in the
//! store are neither duplicated nor counted. Parents are committed before
//! their children; leaf rows are committed in small batches.

use chrono::Utc;
use serde::Serialize;
use study_core::{
  content::{Category, ContentKind},
  store::{BatchOutcome, ContentStore, WriteBatch, WriteOp},
};
use study_legacy::{FLASHCARDS_FILE, FlashcardDocument, QUIZZES_FILE, QuizDocument};

use crate::{
  ContentService,
  error::{Error, store_err},
};

/// Cards committed per transaction.
pub const CARD_BATCH: usize = 10;
/// Quizzes committed per transaction.
pub const QUIZ_BATCH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
  pub success: bool,
  pub message: String,
  /// Leaf records (cards or quizzes) actually inserted.
  pub created: usize,
}

enum Halt {
  NoSource(&'static str),
  Failed(Error),
}

impl From<Error> for Halt {
  fn from(e: Error) -> Self { Self::Failed(e) }
}

impl From<study_legacy::Error> for Halt {
  fn from(e: study_legacy::Error) -> Self { Self::Failed(e.into()) }
}

impl<S: ContentStore> ContentService<S> {
  /// Copy every entity of `kind` from its legacy file into the store.
  pub async fn migrate(&self, kind: ContentKind) -> MigrationReport {
    tracing::info!(%kind, "starting migration");
    let mut created = 0;

    let outcome = match kind {
      ContentKind::Flashcards => self.migrate_flashcards(&mut created).await,
      ContentKind::Quizzes => self.migrate_quizzes(&mut created).await,
    };

    let report = match outcome {
      Ok(()) => {
        let noun = match kind {
          ContentKind::Flashcards => "cards",
          ContentKind::Quizzes => "quizzes",
        };
        MigrationReport {
          success: true,
          message: format!("Data migrated successfully. Total {noun}: {created}"),
          created,
        }
      }
      Err(Halt::NoSource(message)) => MigrationReport {
        success: false,
        message: message.to_owned(),
        created,
      },
      Err(Halt::Failed(e)) => {
        tracing::error!(%kind, created, "migration aborted: {e}");
        MigrationReport {
          success: false,
          message: format!("Migration failed: {e}"),
          created,
        }
      }
    };

    tracing::info!(%kind, success = report.success, created, "{}", report.message);
    report
  }

  async fn commit(&self, batch: WriteBatch) -> Result<BatchOutcome, Error> {
    if batch.is_empty() {
      return Ok(BatchOutcome::default());
    }
    self.store.apply(batch).await.map_err(store_err)
  }

  async fn migrate_flashcards(&self, created: &mut usize) -> Result<(), Halt> {
    let Some(doc) = self.files.try_load::<FlashcardDocument>(FLASHCARDS_FILE)?
    else {
      return Err(Halt::NoSource("JSON file not found"));
    };

    let now = Utc::now();
    let mut pending = WriteBatch::new();

    for category in &doc.categories {
      if self.store.get_category(&category.id).await.map_err(store_err)?.is_none() {
        self.commit(WriteOp::Category(category.to_category()).into()).await?;
        tracing::info!(category_id = %category.id, "created category");
      }

      for chapter in &category.chapters {
        let existing = self
          .store
          .get_chapter(&chapter.id, &category.id)
          .await
          .map_err(store_err)?;
        if existing.is_none() {
          let op = WriteOp::Chapter(chapter.to_chapter(&category.id));
          self.commit(op.into()).await?;
        }

        for deck in &chapter.decks {
          let existing =
            self.store.get_deck(&deck.id, &chapter.id).await.map_err(store_err)?;
          if existing.is_none() {
            let op = WriteOp::Deck(deck.to_deck(&chapter.id));
            self.commit(op.into()).await?;
          }

          for (position, card) in deck.cards.iter().enumerate() {
            let id = card.composite_id(&deck.id, position);
            if self.store.get_flashcard(&id).await.map_err(store_err)?.is_some() {
              continue;
            }
            pending.push(WriteOp::Flashcard(card.to_flashcard(&deck.id, position, now)));

            if pending.len() >= CARD_BATCH {
              *created += self.commit(pending.take()).await?.flashcards;
              tracing::debug!(created = *created, "committed card batch");
            }
          }
        }
      }
    }

    *created += self.commit(pending).await?.flashcards;
    Ok(())
  }

  async fn migrate_quizzes(&self, created: &mut usize) -> Result<(), Halt> {
    let Some(doc) = self.files.try_load::<QuizDocument>(QUIZZES_FILE)? else {
      return Err(Halt::NoSource("Quizzes JSON file not found"));
    };
    let Some(quizzes) = doc.entries() else {
      return Err(Halt::NoSource("No quizzes found in JSON file"));
    };

    let now = Utc::now();
    let mut pending = WriteBatch::new();

    for quiz in &quizzes {
      if self.store.get_quiz(&quiz.id).await.map_err(store_err)?.is_some() {
        tracing::debug!(quiz_id = %quiz.id, "quiz already present");
        continue;
      }

      let category =
        self.store.get_category(&quiz.category_id).await.map_err(store_err)?;
      if category.is_none() {
        let placeholder = Category {
          id:          quiz.category_id.clone(),
          name:        format!("Category for {}", quiz.title),
          description: "Auto-created during quiz migration".to_owned(),
        };
        self.commit(WriteOp::Category(placeholder).into()).await?;
        tracing::info!(category_id = %quiz.category_id, "created placeholder category");
      }

      pending.push(WriteOp::Quiz(quiz.to_stored_quiz(now)));
      if pending.len() >= QUIZ_BATCH {
        *created += self.commit(pending.take()).await?.quizzes;
      }
    }

    *created += self.commit(pending).await?.quizzes;
    Ok(())
  }
}
