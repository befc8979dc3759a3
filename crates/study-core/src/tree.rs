//! Nested flashcard views and the in-memory filters applied to them.
//!
//! The store returns flat rows; [`assemble`] nests them into
//! category → chapter → deck → card trees, preserving row order at every
//! level. [`FlashcardFilter::apply`] then prunes the trees.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::content::{Category, Chapter, Deck, Flashcard, Quiz};

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckTree {
  pub id:         String,
  pub name:       String,
  pub difficulty: String,
  pub cards:      Vec<Flashcard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterTree {
  pub id:    String,
  pub name:  String,
  pub decks: Vec<DeckTree>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
  pub id:          String,
  pub name:        String,
  pub description: String,
  pub chapters:    Vec<ChapterTree>,
}

impl CategoryTree {
  pub fn card_count(&self) -> usize {
    self
      .chapters
      .iter()
      .flat_map(|ch| &ch.decks)
      .map(|d| d.cards.len())
      .sum()
  }
}

/// Nest flat rows into trees. Rows whose parent is missing are dropped.
pub fn assemble(
  categories: Vec<Category>,
  chapters: Vec<Chapter>,
  decks: Vec<Deck>,
  cards: Vec<Flashcard>,
) -> Vec<CategoryTree> {
  let mut cards_by_deck: HashMap<String, Vec<Flashcard>> = HashMap::new();
  for card in cards {
    cards_by_deck.entry(card.deck_id.clone()).or_default().push(card);
  }

  let mut decks_by_chapter: HashMap<String, Vec<DeckTree>> = HashMap::new();
  for deck in decks {
    let cards = cards_by_deck.remove(&deck.id).unwrap_or_default();
    decks_by_chapter.entry(deck.chapter_id).or_default().push(DeckTree {
      id: deck.id,
      name: deck.name,
      difficulty: deck.difficulty,
      cards,
    });
  }

  let mut chapters_by_category: HashMap<String, Vec<ChapterTree>> =
    HashMap::new();
  for chapter in chapters {
    let decks = decks_by_chapter.remove(&chapter.id).unwrap_or_default();
    chapters_by_category
      .entry(chapter.category_id)
      .or_default()
      .push(ChapterTree { id: chapter.id, name: chapter.name, decks });
  }

  categories
    .into_iter()
    .map(|cat| CategoryTree {
      chapters:    chapters_by_category.remove(&cat.id).unwrap_or_default(),
      id:          cat.id,
      name:        cat.name,
      description: cat.description,
    })
    .collect()
}

// ─── Filters ─────────────────────────────────────────────────────────────────

fn non_blank(v: &Option<String>) -> Option<&str> {
  v.as_deref().filter(|s| !s.is_empty())
}

/// Filters accepted by the flashcard resolver. Blank strings count as unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashcardFilter {
  pub category:   Option<String>,
  pub chapter:    Option<String>,
  pub difficulty: Option<String>,
}

impl FlashcardFilter {
  pub fn category(&self) -> Option<&str> { non_blank(&self.category) }

  pub fn chapter(&self) -> Option<&str> { non_blank(&self.chapter) }

  pub fn difficulty(&self) -> Option<&str> { non_blank(&self.difficulty) }

  /// Prune `trees` in place.
  ///
  /// The chapter filter only takes effect together with a category filter;
  /// chapter ids are meaningful within a category.
  pub fn apply(&self, trees: &mut Vec<CategoryTree>) {
    if let Some(category) = self.category() {
      trees.retain(|c| c.id == category);

      if let Some(chapter) = self.chapter() {
        for cat in trees.iter_mut() {
          cat.chapters.retain(|ch| ch.id == chapter);
        }
      }
    }

    if let Some(difficulty) = self.difficulty() {
      for ch in trees.iter_mut().flat_map(|c| c.chapters.iter_mut()) {
        ch.decks.retain(|d| d.difficulty == difficulty);
      }
    }
  }
}

/// Equality filters accepted by the quiz resolver. Blank strings count as
/// unset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizFilter {
  pub category:   Option<String>,
  pub difficulty: Option<String>,
}

impl QuizFilter {
  pub fn category(&self) -> Option<&str> { non_blank(&self.category) }

  pub fn difficulty(&self) -> Option<&str> { non_blank(&self.difficulty) }

  pub fn matches(&self, quiz: &Quiz) -> bool {
    self.category().is_none_or(|c| quiz.category_id == c)
      && self.difficulty().is_none_or(|d| quiz.difficulty == d)
  }
}
