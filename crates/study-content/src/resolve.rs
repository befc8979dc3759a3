//! Read paths: which backend answers a listing.
//!
//! Flashcards are served from the store only. Quizzes walk
//! [`QuizSource::FALLBACK_ORDER`] and take the first non-empty answer.
//! Neither listing ever fails; problems surface as an `error` marker next to
//! whatever could be returned.

use serde::Serialize;
use study_core::{
  content::Quiz,
  store::ContentStore,
  tree::{CategoryTree, FlashcardFilter, QuizFilter},
};
use study_legacy::{LegacyQuiz, QUIZZES_FILE, QuizDocument};

use crate::{
  ContentService,
  error::{Result, store_err},
};

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlashcardListing {
  pub categories: Vec<CategoryTree>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:      Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizSource {
  Database,
  LegacyFile,
}

impl QuizSource {
  pub const FALLBACK_ORDER: [QuizSource; 2] =
    [QuizSource::Database, QuizSource::LegacyFile];
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuizListing {
  pub quizzes: Vec<Quiz>,
  /// The source that produced `quizzes`; absent when nothing matched.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub source:  Option<QuizSource>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
}

impl<S: ContentStore> ContentService<S> {
  /// Nested category trees from the store, pruned by `filter`.
  pub async fn resolve_flashcards(
    &self,
    filter: &FlashcardFilter,
  ) -> FlashcardListing {
    tracing::debug!(?filter, "resolving flashcards");

    match self.store.category_trees(filter.category()).await {
      Ok(mut categories) => {
        filter.apply(&mut categories);
        FlashcardListing { categories, error: None }
      }
      Err(e) => {
        tracing::error!("error loading flashcards: {e}");
        FlashcardListing {
          categories: Vec::new(),
          error:      Some(store_err(e).to_string()),
        }
      }
    }
  }

  /// Quizzes matching `filter` from the first source that has any.
  pub async fn resolve_quizzes(&self, filter: &QuizFilter) -> QuizListing {
    tracing::debug!(?filter, "resolving quizzes");
    let mut first_error = None;

    for source in QuizSource::FALLBACK_ORDER {
      match self.quizzes_from(source, filter).await {
        Ok(quizzes) if !quizzes.is_empty() => {
          tracing::debug!(?source, count = quizzes.len(), "quizzes resolved");
          return QuizListing { quizzes, source: Some(source), error: None };
        }
        Ok(_) => tracing::debug!(?source, "no matching quizzes"),
        Err(e) => {
          tracing::warn!(?source, "quiz source failed: {e}");
          first_error.get_or_insert_with(|| e.to_string());
        }
      }
    }

    QuizListing { quizzes: Vec::new(), source: None, error: first_error }
  }

  async fn quizzes_from(
    &self,
    source: QuizSource,
    filter: &QuizFilter,
  ) -> Result<Vec<Quiz>> {
    match source {
      QuizSource::Database => {
        self.store.list_quizzes(filter).await.map_err(store_err)
      }
      QuizSource::LegacyFile => Ok(
        self
          .legacy_quizzes()?
          .iter()
          .map(LegacyQuiz::to_quiz)
          .filter(|q| filter.matches(q))
          .collect(),
      ),
    }
  }

  fn legacy_quizzes(&self) -> Result<Vec<LegacyQuiz>> {
    let doc: QuizDocument = self.files.load(QUIZZES_FILE)?;
    Ok(doc.entries().unwrap_or_default())
  }

  /// One quiz by id, from the store or else the legacy file.
  pub async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>> {
    match self.store.get_quiz(id).await {
      Ok(Some(quiz)) => return Ok(Some(quiz)),
      Ok(None) => {}
      Err(e) => tracing::warn!(quiz_id = id, "store lookup failed: {e}"),
    }

    Ok(
      self
        .legacy_quizzes()?
        .iter()
        .find(|q| q.id == id)
        .map(LegacyQuiz::to_quiz),
    )
  }
}
