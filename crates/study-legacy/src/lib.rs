//! Legacy JSON content files.
//!
//! Before the relational store existed all content lived in three JSON files
//! (`flashcards.json`, `quizzes.json`, `demos.json`) in one data directory.
//! This crate reads and writes those files: [`document`] holds their typed
//! shapes and [`FlatFileStore`] does the file I/O.
//!
//! ```rust,ignore
//! let files = FlatFileStore::new("static/data");
//! let quizzes: QuizDocument = files.load(QUIZZES_FILE)?;
//! ```

pub mod document;
pub mod error;
pub mod files;

pub use document::{
  Demo, DemoDocument, FlashcardDocument, LegacyCard, LegacyCategory,
  LegacyChapter, LegacyDeck, LegacyQuiz, QuizDocument,
};
pub use error::{Error, Result};
pub use files::{
  DEMOS_FILE, FLASHCARDS_FILE, FlatFileStore, QUIZZES_FILE, file_for,
};
