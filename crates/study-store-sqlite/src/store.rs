//! [`SqliteStore`], the SQLite implementation of [`ContentStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use study_core::{
  content::{Category, Chapter, Deck, Entity, Flashcard, Quiz},
  store::{BatchOutcome, ContentStore, StoreStats, WriteBatch},
  tree::{CategoryTree, QuizFilter, assemble},
};

use crate::{
  Result,
  encode::{
    EncodedOp, QuizRow, RawFlashcard, RawQuiz, category_from_row,
    chapter_from_row, deck_from_row, table_name,
  },
  schema::SCHEMA,
};

const QUIZ_COLUMNS: &str = "id, title, description, category_id, difficulty,
   time_limit_minutes, questions_json, created_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A content store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContentStore impl ───────────────────────────────────────────────────────

impl ContentStore for SqliteStore {
  type Error = crate::Error;

  // ── Point lookups ─────────────────────────────────────────────────────────

  async fn get_category(&self, id: &str) -> Result<Option<Category>> {
    let id = id.to_owned();
    let category = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, description FROM categories WHERE id = ?1",
              rusqlite::params![id],
              category_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(category)
  }

  async fn get_chapter(&self, id: &str, category_id: &str) -> Result<Option<Chapter>> {
    let id = id.to_owned();
    let category_id = category_id.to_owned();
    let chapter = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, category_id FROM chapters
               WHERE id = ?1 AND category_id = ?2",
              rusqlite::params![id, category_id],
              chapter_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(chapter)
  }

  async fn get_deck(&self, id: &str, chapter_id: &str) -> Result<Option<Deck>> {
    let id = id.to_owned();
    let chapter_id = chapter_id.to_owned();
    let deck = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, difficulty, chapter_id FROM decks
               WHERE id = ?1 AND chapter_id = ?2",
              rusqlite::params![id, chapter_id],
              deck_from_row,
            )
            .optional()?,
        )
      })
      .await?;
    Ok(deck)
  }

  async fn get_flashcard(&self, id: &str) -> Result<Option<Flashcard>> {
    let id = id.to_owned();
    let raw: Option<RawFlashcard> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, question, answer, deck_id, created_at
               FROM flashcards WHERE id = ?1",
              rusqlite::params![id],
              RawFlashcard::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawFlashcard::into_flashcard).transpose()
  }

  async fn get_quiz(&self, id: &str) -> Result<Option<Quiz>> {
    let id = id.to_owned();
    let raw: Option<RawQuiz> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = ?1"),
              rusqlite::params![id],
              RawQuiz::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawQuiz::into_quiz).transpose()
  }

  // ── Listings ──────────────────────────────────────────────────────────────

  async fn list_categories(&self) -> Result<Vec<Category>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, name, description FROM categories ORDER BY rowid")?;
        let rows = stmt
          .query_map([], category_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn list_chapters(&self) -> Result<Vec<Chapter>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT id, name, category_id FROM chapters ORDER BY rowid")?;
        let rows = stmt
          .query_map([], chapter_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn list_decks(&self) -> Result<Vec<Deck>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, difficulty, chapter_id FROM decks ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map([], deck_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn category_trees(&self, category: Option<&str>) -> Result<Vec<CategoryTree>> {
    let category = category.map(str::to_owned);

    let (categories, chapters, decks, raw_cards) = self
      .conn
      .call(move |conn| {
        // `?1 IS NULL` lets one statement serve both the filtered and the
        // unfiltered read.
        let mut stmt = conn.prepare(
          "SELECT id, name, description FROM categories
           WHERE ?1 IS NULL OR id = ?1
           ORDER BY rowid",
        )?;
        let categories = stmt
          .query_map(rusqlite::params![category], category_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT id, name, category_id FROM chapters
           WHERE ?1 IS NULL OR category_id = ?1
           ORDER BY rowid",
        )?;
        let chapters = stmt
          .query_map(rusqlite::params![category], chapter_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT d.id, d.name, d.difficulty, d.chapter_id
           FROM decks d
           JOIN chapters ch ON ch.id = d.chapter_id
           WHERE ?1 IS NULL OR ch.category_id = ?1
           ORDER BY d.rowid",
        )?;
        let decks = stmt
          .query_map(rusqlite::params![category], deck_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT f.id, f.question, f.answer, f.deck_id, f.created_at
           FROM flashcards f
           JOIN decks d     ON d.id  = f.deck_id
           JOIN chapters ch ON ch.id = d.chapter_id
           WHERE ?1 IS NULL OR ch.category_id = ?1
           ORDER BY f.rowid",
        )?;
        let cards = stmt
          .query_map(rusqlite::params![category], RawFlashcard::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((categories, chapters, decks, cards))
      })
      .await?;

    let cards = raw_cards
      .into_iter()
      .map(RawFlashcard::into_flashcard)
      .collect::<Result<Vec<_>>>()?;

    Ok(assemble(categories, chapters, decks, cards))
  }

  async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<Quiz>> {
    let category = filter.category().map(str::to_owned);
    let difficulty = filter.difficulty().map(str::to_owned);

    let raws: Vec<RawQuiz> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUIZ_COLUMNS} FROM quizzes
           WHERE (?1 IS NULL OR category_id = ?1)
             AND (?2 IS NULL OR difficulty = ?2)
           ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![category, difficulty], RawQuiz::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuiz::into_quiz).collect()
  }

  async fn stats(&self) -> Result<StoreStats> {
    let stats = self
      .conn
      .call(|conn| {
        let count = |table: &str| -> rusqlite::Result<u64> {
          let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?;
          Ok(n.max(0) as u64)
        };
        Ok(StoreStats {
          categories: count("categories")?,
          chapters:   count("chapters")?,
          decks:      count("decks")?,
          flashcards: count("flashcards")?,
          quizzes:    count("quizzes")?,
        })
      })
      .await?;
    Ok(stats)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn apply(&self, batch: WriteBatch) -> Result<BatchOutcome> {
    let ops = batch
      .into_ops()
      .into_iter()
      .map(EncodedOp::encode)
      .collect::<Result<Vec<_>>>()?;

    let outcome = self
      .conn
      .call(move |conn| {
        // Dropping `tx` without committing rolls everything back.
        let tx = conn.transaction()?;
        let mut outcome = BatchOutcome::default();

        for op in ops {
          match op {
            EncodedOp::Category(c) => {
              outcome.categories += tx.execute(
                "INSERT INTO categories (id, name, description)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
                rusqlite::params![c.id, c.name, c.description],
              )?;
            }
            EncodedOp::Chapter(ch) => {
              outcome.chapters += tx.execute(
                "INSERT INTO chapters (id, name, category_id)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO NOTHING",
                rusqlite::params![ch.id, ch.name, ch.category_id],
              )?;
            }
            EncodedOp::Deck(d) => {
              outcome.decks += tx.execute(
                "INSERT INTO decks (id, name, difficulty, chapter_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO NOTHING",
                rusqlite::params![d.id, d.name, d.difficulty, d.chapter_id],
              )?;
            }
            EncodedOp::Flashcard { id, question, answer, deck_id, created_at } => {
              outcome.flashcards += tx.execute(
                "INSERT INTO flashcards (id, question, answer, deck_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO NOTHING",
                rusqlite::params![id, question, answer, deck_id, created_at],
              )?;
            }
            EncodedOp::Quiz(q) => {
              outcome.quizzes += tx.execute(
                &format!(
                  "INSERT INTO quizzes ({QUIZ_COLUMNS})
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                   ON CONFLICT(id) DO NOTHING"
                ),
                rusqlite::params![
                  q.id,
                  q.title,
                  q.description,
                  q.category_id,
                  q.difficulty,
                  q.time_limit_minutes,
                  q.questions_json,
                  q.created_at,
                ],
              )?;
            }
          }
        }

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn update_flashcard(
    &self,
    id:       String,
    question: String,
    answer:   String,
  ) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE flashcards SET question = ?2, answer = ?3 WHERE id = ?1",
          rusqlite::params![id, question, answer],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn update_quiz(&self, quiz: Quiz) -> Result<bool> {
    let q = QuizRow::encode(quiz)?;
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE quizzes SET
             title = ?2, description = ?3, category_id = ?4, difficulty = ?5,
             time_limit_minutes = ?6, questions_json = ?7, created_at = ?8
           WHERE id = ?1",
          rusqlite::params![
            q.id,
            q.title,
            q.description,
            q.category_id,
            q.difficulty,
            q.time_limit_minutes,
            q.questions_json,
            q.created_at,
          ],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn delete(&self, entity: Entity, id: String) -> Result<bool> {
    let table = table_name(entity);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM {table} WHERE id = ?1"),
          rusqlite::params![id],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }
}
