//! Error types for `study-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Missing required field: {0}")]
  MissingField(&'static str),

  #[error("Field '{0}' cannot be empty")]
  EmptyField(&'static str),

  #[error("Question '{0}' must have at least one correct answer")]
  NoCorrectAnswer(String),

  #[error("unknown content kind: {0:?}")]
  UnknownKind(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
