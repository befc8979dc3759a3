//! Error type for `study-content`.

use study_core::content::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Input rejected before anything was written.
  #[error(transparent)]
  Invalid(#[from] study_core::Error),

  #[error("{entity} with ID {id} not found")]
  NotFound { entity: Entity, id: String },

  #[error("Database error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error(transparent)]
  Legacy(#[from] study_legacy::Error),
}

impl Error {
  pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
    Self::NotFound { entity, id: id.into() }
  }
}

pub(crate) fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
