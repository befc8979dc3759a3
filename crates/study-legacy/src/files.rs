//! [`FlatFileStore`]: whole-document JSON files in one data directory.

use std::{
  fs,
  io::ErrorKind,
  path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use study_core::content::ContentKind;
use tokio::sync::Mutex;

use crate::{Error, Result};

pub const FLASHCARDS_FILE: &str = "flashcards.json";
pub const QUIZZES_FILE: &str = "quizzes.json";
pub const DEMOS_FILE: &str = "demos.json";

/// The legacy file holding `kind`.
pub fn file_for(kind: ContentKind) -> &'static str {
  match kind {
    ContentKind::Flashcards => FLASHCARDS_FILE,
    ContentKind::Quizzes => QUIZZES_FILE,
  }
}

/// Reads and writes JSON documents under a fixed directory.
///
/// Reads are plain synchronous whole-file loads. Read-modify-write goes
/// through [`FlatFileStore::update`], which holds a process-wide lock so two
/// writers never interleave.
pub struct FlatFileStore {
  dir:        PathBuf,
  write_lock: Mutex<()>,
}

impl FlatFileStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into(), write_lock: Mutex::new(()) }
  }

  pub fn dir(&self) -> &Path { &self.dir }

  pub fn path(&self, name: &str) -> PathBuf { self.dir.join(name) }

  pub fn exists(&self, name: &str) -> bool { self.path(name).is_file() }

  /// Load `name`, or `None` if the file does not exist.
  pub fn try_load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
    let path = self.path(name);
    let raw = match fs::read_to_string(&path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
      Err(source) => {
        return Err(Error::Io { path: path.display().to_string(), source });
      }
    };
    serde_json::from_str(&raw)
      .map(Some)
      .map_err(|source| Error::Json { path: path.display().to_string(), source })
  }

  /// Load `name`; a missing file yields the empty document.
  pub fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
    Ok(self.try_load(name)?.unwrap_or_default())
  }

  /// Write `doc` to `name` as indented JSON, creating the directory if
  /// needed. The file is replaced atomically.
  pub fn save<T: Serialize>(&self, doc: &T, name: &str) -> Result<()> {
    let io_err = |path: &Path| {
      let path = path.display().to_string();
      move |source| Error::Io { path, source }
    };

    fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

    let path = self.path(name);
    let body = serde_json::to_vec_pretty(doc).map_err(|source| Error::Json {
      path: path.display().to_string(),
      source,
    })?;

    let tmp = self.path(&format!(".{name}.tmp"));
    fs::write(&tmp, body).map_err(io_err(&tmp))?;
    fs::rename(&tmp, &path).map_err(io_err(&path))?;
    Ok(())
  }

  /// Load `name`, let `f` mutate it, and write it back, all under the
  /// store's write lock. Nothing is written if loading fails.
  pub async fn update<T, R, F>(&self, name: &str, f: F) -> Result<R>
  where
    T: Serialize + DeserializeOwned + Default,
    F: FnOnce(&mut T) -> R,
  {
    let _guard = self.write_lock.lock().await;
    let mut doc: T = self.load(name)?;
    let out = f(&mut doc);
    self.save(&doc, name)?;
    tracing::debug!(file = name, "rewrote flat file");
    Ok(out)
  }
}
