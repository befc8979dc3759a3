//! SQL schema for the study content store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `foreign_keys` is a per-connection setting, so it lives here rather than
/// in the database file.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS categories (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS chapters (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS decks (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    difficulty  TEXT NOT NULL,
    chapter_id  TEXT NOT NULL REFERENCES chapters(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS flashcards (
    id          TEXT PRIMARY KEY,   -- UUID, or '{deck_id}_{card id}' when migrated
    question    TEXT NOT NULL,
    answer      TEXT NOT NULL,
    deck_id     TEXT NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL       -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS quizzes (
    id                 TEXT PRIMARY KEY,
    title              TEXT NOT NULL,
    description        TEXT NOT NULL DEFAULT '',
    category_id        TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    difficulty         TEXT NOT NULL,
    time_limit_minutes INTEGER NOT NULL DEFAULT 0,
    questions_json     TEXT NOT NULL DEFAULT '[]',
    created_at         TEXT            -- RFC 3339 UTC; NULL for undated legacy quizzes
);

CREATE INDEX IF NOT EXISTS chapters_category_idx  ON chapters(category_id);
CREATE INDEX IF NOT EXISTS decks_chapter_idx      ON decks(chapter_id);
CREATE INDEX IF NOT EXISTS flashcards_deck_idx    ON flashcards(deck_id);
CREATE INDEX IF NOT EXISTS quizzes_category_idx   ON quizzes(category_id);
CREATE INDEX IF NOT EXISTS quizzes_difficulty_idx ON quizzes(difficulty);

PRAGMA user_version = 1;
";
