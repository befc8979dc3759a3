//! Quiz question variants.
//!
//! On the wire a question is a JSON object tagged by `type`. Legacy documents
//! omit the tag for multiple-choice questions, so an untagged object is read
//! as [`Question::MultipleChoice`]. Serialisation always writes the tag.
//!
//! Keys outside the known fields (images, points, hints) ride along in
//! [`QuestionBody::extra`] and are written back unchanged.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result, content::LegacyId};

/// One selectable (or, for short-answer questions, accepted) answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
  pub text:    String,
  #[serde(default)]
  pub correct: bool,
}

/// Fields shared by every question variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBody {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:          Option<LegacyId>,
  pub text:        String,
  #[serde(default)]
  pub answers:     Vec<AnswerOption>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub explanation: Option<String>,
  #[serde(flatten)]
  pub extra:       serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Question {
  /// Pick one or more of `answers`; at least one must be marked correct.
  MultipleChoice(QuestionBody),
  /// Two-option variant of multiple choice.
  TrueFalse(QuestionBody),
  /// Free-text response. `answers` lists accepted responses, possibly none.
  ShortAnswer(QuestionBody),
}

/// Mirror of [`Question`] used after the default tag has been filled in.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TaggedQuestion {
  MultipleChoice(QuestionBody),
  TrueFalse(QuestionBody),
  ShortAnswer(QuestionBody),
}

impl From<TaggedQuestion> for Question {
  fn from(q: TaggedQuestion) -> Self {
    match q {
      TaggedQuestion::MultipleChoice(b) => Self::MultipleChoice(b),
      TaggedQuestion::TrueFalse(b) => Self::TrueFalse(b),
      TaggedQuestion::ShortAnswer(b) => Self::ShortAnswer(b),
    }
  }
}

impl<'de> Deserialize<'de> for Question {
  fn deserialize<D: Deserializer<'de>>(
    deserializer: D,
  ) -> std::result::Result<Self, D::Error> {
    let mut value = serde_json::Value::deserialize(deserializer)?;
    if let Some(obj) = value.as_object_mut() {
      obj
        .entry("type")
        .or_insert_with(|| serde_json::Value::from("multiple_choice"));
    }
    TaggedQuestion::deserialize(value)
      .map(Question::from)
      .map_err(serde::de::Error::custom)
  }
}

impl Question {
  pub fn body(&self) -> &QuestionBody {
    match self {
      Self::MultipleChoice(b) | Self::TrueFalse(b) | Self::ShortAnswer(b) => b,
    }
  }

  pub fn text(&self) -> &str { &self.body().text }

  /// Every question except a short-answer one needs a correct answer.
  pub fn validate(&self) -> Result<()> {
    match self {
      Self::ShortAnswer(_) => Ok(()),
      Self::MultipleChoice(b) | Self::TrueFalse(b) => {
        if b.answers.iter().any(|a| a.correct) {
          Ok(())
        } else {
          Err(Error::NoCorrectAnswer(b.text.clone()))
        }
      }
    }
  }
}

/// Validate a whole question list, failing on the first invalid question.
pub fn validate_all(questions: &[Question]) -> Result<()> {
  questions.iter().try_for_each(Question::validate)
}

/// Serialise a question list for the `questions_json` column.
pub fn encode_questions(questions: &[Question]) -> Result<String> {
  Ok(serde_json::to_string(questions)?)
}

/// Decode a stored question list.
pub fn decode_questions(raw: &str) -> Result<Vec<Question>> {
  if raw.trim().is_empty() {
    return Ok(Vec::new());
  }
  Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn choice(text: &str, correct: &[bool]) -> QuestionBody {
    QuestionBody {
      id:          None,
      text:        text.into(),
      answers:     correct
        .iter()
        .enumerate()
        .map(|(i, c)| AnswerOption { text: format!("option {i}"), correct: *c })
        .collect(),
      explanation: None,
      extra:       Default::default(),
    }
  }

  #[test]
  fn untagged_object_is_multiple_choice() {
    let q: Question = serde_json::from_value(json!({
      "text": "What does SEER measure?",
      "answers": [
        { "text": "Cooling efficiency", "correct": true },
        { "text": "Airflow" }
      ]
    }))
    .unwrap();
    assert!(matches!(q, Question::MultipleChoice(_)));
    assert_eq!(q.body().answers.len(), 2);
    assert!(!q.body().answers[1].correct);
  }

  #[test]
  fn tagged_short_answer() {
    let q: Question = serde_json::from_value(json!({
      "type": "short_answer",
      "text": "Name the refrigerant used in most new split systems.",
      "explanation": "R-410A is being phased down."
    }))
    .unwrap();
    assert!(matches!(q, Question::ShortAnswer(_)));
    assert!(q.body().answers.is_empty());
  }

  #[test]
  fn unknown_type_is_rejected() {
    let res: std::result::Result<Question, _> =
      serde_json::from_value(json!({ "type": "essay", "text": "?" }));
    assert!(res.is_err());
  }

  #[test]
  fn serialisation_writes_tag() {
    let q = Question::TrueFalse(choice("Heat flows cold to hot.", &[false, true]));
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["type"], "true_false");
    assert_eq!(v["text"], "Heat flows cold to hot.");
  }

  #[test]
  fn encode_decode_preserves_questions() {
    let questions = vec![
      Question::MultipleChoice(choice("a", &[true, false])),
      Question::ShortAnswer(QuestionBody {
        id:          Some("q2".into()),
        text:        "b".into(),
        answers:     vec![],
        explanation: Some("because".into()),
        extra:       Default::default(),
      }),
    ];
    let raw = encode_questions(&questions).unwrap();
    assert_eq!(decode_questions(&raw).unwrap(), questions);
  }

  #[test]
  fn unknown_keys_survive_a_column_round_trip() {
    let input = json!([{
      "id": 1,
      "text": "Which coil is this?",
      "image": "coil.png",
      "points": 2,
      "answers": [{ "text": "Evaporator", "correct": true }]
    }]);
    let questions: Vec<Question> = serde_json::from_value(input).unwrap();
    let body = questions[0].body();
    assert_eq!(body.id, Some(LegacyId::Number(1u64.into())));
    assert_eq!(body.extra["image"], "coil.png");

    let raw = encode_questions(&questions).unwrap();
    let back: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(back[0]["image"], "coil.png");
    assert_eq!(back[0]["points"], 2);
    assert_eq!(back[0]["id"], 1);
    assert_eq!(back[0]["type"], "multiple_choice");
    assert!(back[0].get("extra").is_none());
    assert_eq!(decode_questions(&raw).unwrap(), questions);
  }

  #[test]
  fn blank_column_decodes_to_empty() {
    assert!(decode_questions("").unwrap().is_empty());
  }

  #[test]
  fn choice_without_correct_answer_fails_validation() {
    let q = Question::MultipleChoice(choice("Pick one", &[false, false]));
    let err = q.validate().unwrap_err();
    assert_eq!(
      err.to_string(),
      "Question 'Pick one' must have at least one correct answer"
    );
  }

  #[test]
  fn short_answer_needs_no_correct_flag() {
    let q = Question::ShortAnswer(choice("Explain superheat", &[]));
    assert!(q.validate().is_ok());
  }

  #[test]
  fn validate_all_stops_at_first_failure() {
    let qs = vec![
      Question::MultipleChoice(choice("ok", &[true])),
      Question::TrueFalse(choice("bad", &[false, false])),
    ];
    assert!(matches!(validate_all(&qs), Err(Error::NoCorrectAnswer(t)) if t == "bad"));
  }
}
