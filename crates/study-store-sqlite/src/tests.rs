//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use study_core::{
  content::{Category, Chapter, Deck, Entity, Flashcard, Quiz},
  question::{AnswerOption, Question, QuestionBody},
  store::{ContentStore, WriteBatch, WriteOp},
  tree::QuizFilter,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn category(id: &str) -> WriteOp {
  WriteOp::Category(Category {
    id:          id.into(),
    name:        format!("Category {id}"),
    description: String::new(),
  })
}

fn chapter(id: &str, category_id: &str) -> WriteOp {
  WriteOp::Chapter(Chapter {
    id:          id.into(),
    name:        format!("Chapter {id}"),
    category_id: category_id.into(),
  })
}

fn deck(id: &str, chapter_id: &str, difficulty: &str) -> WriteOp {
  WriteOp::Deck(Deck {
    id:         id.into(),
    name:       format!("Deck {id}"),
    difficulty: difficulty.into(),
    chapter_id: chapter_id.into(),
  })
}

fn card(id: &str, deck_id: &str) -> WriteOp {
  WriteOp::Flashcard(Flashcard {
    id:         id.into(),
    question:   format!("What is {id}?"),
    answer:     format!("{id} is a card"),
    deck_id:    deck_id.into(),
    created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
  })
}

fn quiz(id: &str, category_id: &str, difficulty: &str) -> Quiz {
  Quiz {
    id:                 id.into(),
    title:              format!("Quiz {id}"),
    description:        "A quiz".into(),
    category_id:        category_id.into(),
    difficulty:         difficulty.into(),
    time_limit_minutes: 15,
    questions:          vec![
      Question::MultipleChoice(QuestionBody {
        id:          Some("q1".into()),
        text:        "Which unit measures pressure?".into(),
        answers:     vec![
          AnswerOption { text: "PSI".into(), correct: true },
          AnswerOption { text: "CFM".into(), correct: false },
        ],
        explanation: Some("CFM measures airflow.".into()),
        extra:       Default::default(),
      }),
      Question::ShortAnswer(QuestionBody {
        id:          None,
        text:        "Name a refrigerant.".into(),
        answers:     vec![AnswerOption { text: "R-410A".into(), correct: true }],
        explanation: None,
        extra:       Default::default(),
      }),
    ],
    created_at:         Some(Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap()),
  }
}

/// One category with two chapters, three decks and four cards.
async fn seeded() -> SqliteStore {
  let s = store().await;
  let batch: WriteBatch = [
    category("hvac"),
    chapter("basics", "hvac"),
    chapter("airflow", "hvac"),
    deck("d-easy", "basics", "easy"),
    deck("d-hard", "basics", "hard"),
    deck("d-air", "airflow", "easy"),
    card("c1", "d-easy"),
    card("c2", "d-easy"),
    card("c3", "d-hard"),
    card("c4", "d-air"),
  ]
  .into_iter()
  .collect();
  s.apply(batch).await.unwrap();
  s
}

// ─── Batches ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_reports_inserted_rows() {
  let s = store().await;
  let outcome = s
    .apply(
      [category("a"), chapter("ch", "a"), deck("d", "ch", "easy"), card("c", "d")]
        .into_iter()
        .collect(),
    )
    .await
    .unwrap();
  assert_eq!(outcome.categories, 1);
  assert_eq!(outcome.chapters, 1);
  assert_eq!(outcome.decks, 1);
  assert_eq!(outcome.flashcards, 1);
  assert_eq!(outcome.quizzes, 0);
}

#[tokio::test]
async fn reapplying_a_batch_inserts_nothing() {
  let s = seeded().await;
  let again: WriteBatch = [category("hvac"), deck("d-easy", "basics", "easy"), card("c1", "d-easy")]
    .into_iter()
    .collect();
  let outcome = s.apply(again).await.unwrap();
  assert_eq!(outcome, Default::default());

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.flashcards, 4);
}

#[tokio::test]
async fn existing_rows_are_not_overwritten() {
  let s = seeded().await;
  s.apply(
    [WriteOp::Category(Category {
      id:          "hvac".into(),
      name:        "Renamed".into(),
      description: "changed".into(),
    })]
    .into_iter()
    .collect(),
  )
  .await
  .unwrap();
  let cat = s.get_category("hvac").await.unwrap().unwrap();
  assert_eq!(cat.name, "Category hvac");
}

#[tokio::test]
async fn failed_batch_is_rolled_back() {
  let s = store().await;
  // The card references a deck that does not exist: the FK check fails and
  // the category inserted earlier in the same batch must not survive.
  let res = s
    .apply([category("orphan"), card("c", "no-such-deck")].into_iter().collect())
    .await;
  assert!(res.is_err());
  assert!(s.get_category("orphan").await.unwrap().is_none());
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn scoped_lookups_respect_parent() {
  let s = seeded().await;
  assert!(s.get_chapter("basics", "hvac").await.unwrap().is_some());
  assert!(s.get_chapter("basics", "other").await.unwrap().is_none());
  assert!(s.get_deck("d-hard", "basics").await.unwrap().is_some());
  assert!(s.get_deck("d-hard", "airflow").await.unwrap().is_none());
}

#[tokio::test]
async fn flashcard_roundtrip() {
  let s = seeded().await;
  let c = s.get_flashcard("c3").await.unwrap().unwrap();
  assert_eq!(c.deck_id, "d-hard");
  assert_eq!(c.question, "What is c3?");
  assert_eq!(c.created_at, Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
  assert!(s.get_flashcard("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn listings_preserve_insertion_order() {
  let s = seeded().await;
  let chapters: Vec<String> =
    s.list_chapters().await.unwrap().into_iter().map(|c| c.id).collect();
  assert_eq!(chapters, ["basics", "airflow"]);
  let decks: Vec<String> =
    s.list_decks().await.unwrap().into_iter().map(|d| d.id).collect();
  assert_eq!(decks, ["d-easy", "d-hard", "d-air"]);
  assert_eq!(s.list_categories().await.unwrap().len(), 1);
}

// ─── Trees ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn category_trees_nest_everything() {
  let s = seeded().await;
  s.apply([category("empty")].into_iter().collect()).await.unwrap();

  let trees = s.category_trees(None).await.unwrap();
  assert_eq!(trees.len(), 2);
  assert_eq!(trees[0].id, "hvac");
  assert_eq!(trees[0].card_count(), 4);
  assert_eq!(trees[0].chapters[0].decks[0].cards.len(), 2);
  assert!(trees[1].chapters.is_empty());
}

#[tokio::test]
async fn category_trees_filtered_by_id() {
  let s = seeded().await;
  s.apply(
    [category("elec"), chapter("ohm", "elec"), deck("d-ohm", "ohm", "easy"), card("c9", "d-ohm")]
      .into_iter()
      .collect(),
  )
  .await
  .unwrap();

  let trees = s.category_trees(Some("elec")).await.unwrap();
  assert_eq!(trees.len(), 1);
  assert_eq!(trees[0].card_count(), 1);

  assert!(s.category_trees(Some("nope")).await.unwrap().is_empty());
}

// ─── Quizzes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn quiz_questions_roundtrip() {
  let s = seeded().await;
  let original = quiz("qz", "hvac", "easy");
  s.apply([WriteOp::Quiz(original.clone())].into_iter().collect())
    .await
    .unwrap();

  let loaded = s.get_quiz("qz").await.unwrap().unwrap();
  assert_eq!(loaded, original);
}

#[tokio::test]
async fn corrupt_questions_column_reads_as_empty() {
  let s = seeded().await;
  s.apply([WriteOp::Quiz(quiz("qz", "hvac", "easy"))].into_iter().collect())
    .await
    .unwrap();
  s.conn
    .call(|conn| {
      conn.execute("UPDATE quizzes SET questions_json = '{not json' WHERE id = 'qz'", [])?;
      Ok(())
    })
    .await
    .unwrap();

  let loaded = s.get_quiz("qz").await.unwrap().unwrap();
  assert!(loaded.questions.is_empty());
  assert_eq!(loaded.title, "Quiz qz");
}

#[tokio::test]
async fn list_quizzes_applies_equality_filters() {
  let s = seeded().await;
  s.apply([category("c1"), category("c2")].into_iter().collect())
    .await
    .unwrap();
  s.apply(
    [
      WriteOp::Quiz(quiz("a", "c1", "easy")),
      WriteOp::Quiz(quiz("b", "c1", "hard")),
      WriteOp::Quiz(quiz("c", "c2", "easy")),
    ]
    .into_iter()
    .collect(),
  )
  .await
  .unwrap();

  let filter = QuizFilter { category: Some("c1".into()), difficulty: Some("easy".into()) };
  let found = s.list_quizzes(&filter).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, "a");
  assert!(found.iter().all(|q| filter.matches(q)));

  let by_difficulty = QuizFilter { difficulty: Some("easy".into()), ..Default::default() };
  assert_eq!(s.list_quizzes(&by_difficulty).await.unwrap().len(), 2);
  assert_eq!(s.list_quizzes(&QuizFilter::default()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn update_quiz_overwrites_columns() {
  let s = seeded().await;
  s.apply([WriteOp::Quiz(quiz("qz", "hvac", "easy"))].into_iter().collect())
    .await
    .unwrap();

  let mut changed = quiz("qz", "hvac", "hard");
  changed.title = "Renamed".into();
  changed.questions.truncate(1);
  assert!(s.update_quiz(changed.clone()).await.unwrap());
  assert_eq!(s.get_quiz("qz").await.unwrap().unwrap(), changed);

  assert!(!s.update_quiz(quiz("ghost", "hvac", "easy")).await.unwrap());
}

// ─── Updates and deletes ─────────────────────────────────────────────────────

#[tokio::test]
async fn update_flashcard_text() {
  let s = seeded().await;
  assert!(
    s.update_flashcard("c1".into(), "New Q".into(), "New A".into())
      .await
      .unwrap()
  );
  let c = s.get_flashcard("c1").await.unwrap().unwrap();
  assert_eq!((c.question.as_str(), c.answer.as_str()), ("New Q", "New A"));
  assert!(
    !s.update_flashcard("zz".into(), "q".into(), "a".into())
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn deleting_a_category_cascades() {
  let s = seeded().await;
  s.apply([WriteOp::Quiz(quiz("qz", "hvac", "easy"))].into_iter().collect())
    .await
    .unwrap();

  assert!(s.delete(Entity::Category, "hvac".into()).await.unwrap());

  let stats = s.stats().await.unwrap();
  assert_eq!(stats, Default::default());
}

#[tokio::test]
async fn deleting_a_deck_removes_only_its_cards() {
  let s = seeded().await;
  assert!(s.delete(Entity::Deck, "d-easy".into()).await.unwrap());
  let stats = s.stats().await.unwrap();
  assert_eq!(stats.decks, 2);
  assert_eq!(stats.flashcards, 2);
  assert_eq!(stats.chapters, 2);
}

#[tokio::test]
async fn delete_missing_returns_false() {
  let s = seeded().await;
  assert!(!s.delete(Entity::Flashcard, "nope".into()).await.unwrap());
  assert!(s.delete(Entity::Flashcard, "c1".into()).await.unwrap());
  assert!(!s.delete(Entity::Flashcard, "c1".into()).await.unwrap());
}
