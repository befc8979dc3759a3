//! Error type for `study-legacy`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("io error on {path}: {source}")]
  Io {
    path:   String,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed JSON in {path}: {source}")]
  Json {
    path:   String,
    #[source]
    source: serde_json::Error,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
