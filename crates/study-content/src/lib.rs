//! Content operations for the study service.
//!
//! [`ContentService`] sits between the HTTP layer and the two places content
//! lives: the relational [`ContentStore`] and the legacy JSON files behind a
//! [`FlatFileStore`]. It decides which of the two answers a read, moves
//! legacy data into the store, and performs every validated write.
//!
//! ```rust,ignore
//! let service = ContentService::new(Arc::new(store), Arc::new(FlatFileStore::new(dir)));
//! let listing = service.resolve_quizzes(&QuizFilter::default()).await;
//! ```

pub mod demos;
pub mod error;
pub mod migrate;
pub mod mutate;
pub mod resolve;

use std::sync::Arc;

use study_core::store::ContentStore;
use study_legacy::FlatFileStore;

pub use demos::{DemoListing, NewDemo};
pub use error::{Error, Result};
pub use migrate::MigrationReport;
pub use mutate::{FlashcardEdit, NewFlashcard, NewQuiz, QuizPatch};
pub use resolve::{FlashcardListing, QuizListing, QuizSource};

/// Handle to both content backends. Cheap to clone.
pub struct ContentService<S> {
  store: Arc<S>,
  files: Arc<FlatFileStore>,
}

impl<S> Clone for ContentService<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), files: self.files.clone() }
  }
}

impl<S: ContentStore> ContentService<S> {
  pub fn new(store: Arc<S>, files: Arc<FlatFileStore>) -> Self {
    Self { store, files }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn files(&self) -> &FlatFileStore { &self.files }
}
