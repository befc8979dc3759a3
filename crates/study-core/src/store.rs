//! The `ContentStore` trait and supporting write types.
//!
//! The trait is implemented by storage backends (e.g. `study-store-sqlite`).
//! Higher layers (`study-content`, `study-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use serde::Serialize;

use crate::{
  content::{Category, Chapter, Deck, Entity, Flashcard, Quiz},
  tree::{CategoryTree, QuizFilter},
};

// ─── Write batches ───────────────────────────────────────────────────────────

/// A single insert-if-absent operation.
#[derive(Debug, Clone)]
pub enum WriteOp {
  Category(Category),
  Chapter(Chapter),
  Deck(Deck),
  Flashcard(Flashcard),
  Quiz(Quiz),
}

/// An ordered set of inserts applied in one transaction by
/// [`ContentStore::apply`].
///
/// Each insert is skipped when a row with the same primary key already
/// exists, so re-applying a batch never duplicates rows. Order matters:
/// parents must precede their children.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
  ops: Vec<WriteOp>,
}

impl WriteBatch {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, op: WriteOp) { self.ops.push(op); }

  pub fn len(&self) -> usize { self.ops.len() }

  pub fn is_empty(&self) -> bool { self.ops.is_empty() }

  pub fn ops(&self) -> &[WriteOp] { &self.ops }

  /// Empty the batch, returning its operations.
  pub fn take(&mut self) -> Self { std::mem::take(self) }

  pub fn into_ops(self) -> Vec<WriteOp> { self.ops }
}

impl From<WriteOp> for WriteBatch {
  fn from(op: WriteOp) -> Self { Self { ops: vec![op] } }
}

impl FromIterator<WriteOp> for WriteBatch {
  fn from_iter<I: IntoIterator<Item = WriteOp>>(iter: I) -> Self {
    Self { ops: iter.into_iter().collect() }
  }
}

/// Rows actually inserted by a batch, per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
  pub categories: usize,
  pub chapters:   usize,
  pub decks:      usize,
  pub flashcards: usize,
  pub quizzes:    usize,
}

impl std::ops::AddAssign for BatchOutcome {
  fn add_assign(&mut self, rhs: Self) {
    self.categories += rhs.categories;
    self.chapters += rhs.chapters;
    self.decks += rhs.decks;
    self.flashcards += rhs.flashcards;
    self.quizzes += rhs.quizzes;
  }
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
  pub categories: u64,
  pub chapters:   u64,
  pub decks:      u64,
  pub flashcards: u64,
  pub quizzes:    u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational content store.
///
/// Deleting a parent removes all of its descendants. Every write is
/// transactional: on failure nothing from that call is persisted.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Point lookups ─────────────────────────────────────────────────────

  fn get_category<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Category>, Self::Error>> + Send + 'a;

  /// Look up a chapter by id within its category.
  fn get_chapter<'a>(
    &'a self,
    id: &'a str,
    category_id: &'a str,
  ) -> impl Future<Output = Result<Option<Chapter>, Self::Error>> + Send + 'a;

  /// Look up a deck by id within its chapter.
  fn get_deck<'a>(
    &'a self,
    id: &'a str,
    chapter_id: &'a str,
  ) -> impl Future<Output = Result<Option<Deck>, Self::Error>> + Send + 'a;

  fn get_flashcard<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Flashcard>, Self::Error>> + Send + 'a;

  fn get_quiz<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Quiz>, Self::Error>> + Send + 'a;

  // ── Listings ──────────────────────────────────────────────────────────

  fn list_categories(
    &self,
  ) -> impl Future<Output = Result<Vec<Category>, Self::Error>> + Send + '_;

  fn list_chapters(
    &self,
  ) -> impl Future<Output = Result<Vec<Chapter>, Self::Error>> + Send + '_;

  fn list_decks(
    &self,
  ) -> impl Future<Output = Result<Vec<Deck>, Self::Error>> + Send + '_;

  /// Nested category trees, optionally restricted to one category id.
  fn category_trees<'a>(
    &'a self,
    category: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<CategoryTree>, Self::Error>> + Send + 'a;

  /// Quizzes matching the equality filters in `filter`.
  fn list_quizzes<'a>(
    &'a self,
    filter: &'a QuizFilter,
  ) -> impl Future<Output = Result<Vec<Quiz>, Self::Error>> + Send + 'a;

  fn stats(
    &self,
  ) -> impl Future<Output = Result<StoreStats, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Apply `batch` in a single transaction and report what was inserted.
  fn apply(
    &self,
    batch: WriteBatch,
  ) -> impl Future<Output = Result<BatchOutcome, Self::Error>> + Send + '_;

  /// Replace a flashcard's question and answer. Returns `false` if no card
  /// has that id.
  fn update_flashcard(
    &self,
    id: String,
    question: String,
    answer: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite every column of the quiz with `quiz.id`. Returns `false` if
  /// no quiz has that id.
  fn update_quiz(
    &self,
    quiz: Quiz,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete one row (and its descendants). Returns `false` if it did not
  /// exist.
  fn delete(
    &self,
    entity: Entity,
    id: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
