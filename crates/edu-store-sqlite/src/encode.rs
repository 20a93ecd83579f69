//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. `other_answers` is stored as a
//! compact JSON list of strings.

use chrono::{DateTime, Utc};
use edu_core::question::Question;
use rusqlite::{Row, types::Type};

use crate::{Error, Result};

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// Read an RFC 3339 column inside a row-mapping closure.
pub fn read_dt(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let raw: String = row.get(idx)?;
  DateTime::parse_from_rfc3339(&raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// ─── References ──────────────────────────────────────────────────────────────

/// Hierarchy references are stored as NULL or 0 when unset.
pub fn decode_ref(raw: Option<i64>) -> Option<i64> { raw.filter(|id| *id > 0) }

// ─── Answers ─────────────────────────────────────────────────────────────────

pub fn encode_answers(answers: &[String]) -> Result<String> {
  Ok(serde_json::to_string(answers)?)
}

/// Lenient: rows written by other tools may hold anything here. An
/// unreadable blob becomes an empty list.
pub fn decode_answers(question_id: i64, s: Option<&str>) -> Vec<String> {
  match s.map(str::trim) {
    None | Some("") => Vec::new(),
    Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
      tracing::warn!(question_id, error = %e, "unreadable other_answers");
      Vec::new()
    }),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawQuestion::from_row`], aliased `q`.
pub const QUESTION_COLUMNS: &str = "q.id, q.grade_id, q.lesson_id, q.topic_id, \
   q.subtopic_id, q.tutor_id, q.tute_id, q.question, q.question_img_url, \
   q.correct_answer, q.theory, q.solution, q.other_answers, q.created_at";

/// Raw values read directly from a `questions` row.
pub struct RawQuestion {
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
  pub other_answers:    Option<String>,
  pub created_at:       String,
}

impl RawQuestion {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:               row.get(0)?,
      grade_id:         row.get(1)?,
      lesson_id:        row.get(2)?,
      topic_id:         row.get(3)?,
      subtopic_id:      row.get(4)?,
      tutor_id:         row.get(5)?,
      tute_id:          row.get(6)?,
      question:         row.get(7)?,
      question_img_url: row.get(8)?,
      correct_answer:   row.get(9)?,
      theory:           row.get(10)?,
      solution:         row.get(11)?,
      other_answers:    row.get(12)?,
      created_at:       row.get(13)?,
    })
  }

  pub fn into_question(self) -> Result<Question> {
    let other_answers = decode_answers(self.id, self.other_answers.as_deref());
    Ok(Question {
      id: self.id,
      grade_id: decode_ref(self.grade_id),
      lesson_id: decode_ref(self.lesson_id),
      topic_id: decode_ref(self.topic_id),
      subtopic_id: decode_ref(self.subtopic_id),
      tutor_id: decode_ref(self.tutor_id),
      tute_id: decode_ref(self.tute_id),
      question: self.question,
      question_img_url: self.question_img_url,
      correct_answer: self.correct_answer,
      theory: self.theory,
      solution: self.solution,
      other_answers,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
