//! MCQ questions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, validate};

/// A stored multiple-choice question.
///
/// Every hierarchy reference is optional. A question without a lesson
/// ("lesson-unscoped") applies directly at the grade level through
/// `grade_id`; one with a lesson is placed in the curriculum through the
/// grade↔subject↔lesson links instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id:               i64,
  pub grade_id:         Option<i64>,
  pub lesson_id:        Option<i64>,
  pub topic_id:         Option<i64>,
  pub subtopic_id:      Option<i64>,
  pub tutor_id:         Option<i64>,
  pub tute_id:          Option<i64>,
  pub question:         String,
  pub question_img_url: Option<String>,
  pub correct_answer:   String,
  pub theory:           Option<String>,
  pub solution:         Option<String>,
  pub other_answers:    Vec<String>,
  pub created_at:       DateTime<Utc>,
}

/// JSON body accepted by question create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewQuestion {
  pub grade_id:         Option<i64>,
  pub lesson_id:        Option<i64>,
  pub topic_id:         Option<i64>,
  pub subtopic_id:      Option<i64>,
  pub tutor_id:         Option<i64>,
  pub tute_id:          Option<i64>,
  pub question:         String,
  pub question_img_url: Option<String>,
  pub correct_answer:   String,
  pub theory:           Option<String>,
  pub solution:         Option<String>,
  pub other_answers:    Vec<String>,
}

impl NewQuestion {
  pub fn validate(&self) -> Result<()> {
    validate::required_id("gradeId", self.grade_id.unwrap_or(0))?;
    if self.question.trim().is_empty() {
      return Err(Error::invalid("question is required"));
    }
    Ok(())
  }

  /// Map zero or negative references to `None`; unset is stored as NULL.
  pub fn normalized(self) -> Self {
    let id = |v: Option<i64>| v.filter(|id| *id > 0);
    Self {
      grade_id: id(self.grade_id),
      lesson_id: id(self.lesson_id),
      topic_id: id(self.topic_id),
      subtopic_id: id(self.subtopic_id),
      tutor_id: id(self.tutor_id),
      tute_id: id(self.tute_id),
      ..self
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn body() -> NewQuestion {
    NewQuestion {
      grade_id: Some(1),
      question: "2 + 2 = ?".into(),
      correct_answer: "4".into(),
      ..Default::default()
    }
  }

  #[test]
  fn grade_is_required() {
    let mut q = body();
    q.grade_id = Some(0);
    assert_eq!(q.validate().unwrap_err().to_string(), "gradeId is required");
    q.grade_id = None;
    assert!(q.validate().is_err());
  }

  #[test]
  fn blank_question_is_rejected() {
    let mut q = body();
    q.question = "  ".into();
    assert!(q.validate().is_err());
    assert!(body().validate().is_ok());
  }

  #[test]
  fn normalized_clears_zero_references() {
    let mut q = body();
    q.lesson_id = Some(0);
    q.topic_id = Some(4);
    let q = q.normalized();
    assert_eq!(q.lesson_id, None);
    assert_eq!(q.topic_id, Some(4));
  }

  #[test]
  fn body_defaults_missing_fields() {
    let q: NewQuestion = serde_json::from_str(
      r#"{"gradeId": 2, "question": "Q", "correctAnswer": "A", "otherAnswers": ["B", "C"]}"#,
    )
    .unwrap();
    assert_eq!(q.lesson_id, None);
    assert_eq!(q.other_answers, vec!["B", "C"]);
  }
}
