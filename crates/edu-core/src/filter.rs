//! The question-listing filter.
//!
//! Seven optional dimensions narrow a question listing. Values arrive from
//! query strings or JSON, as numbers or numeric strings, and are normalised
//! once here: anything that is not a positive integer (zero, blank,
//! negative, or unparseable) means "dimension not applied". Bad values are
//! dropped silently rather than rejected.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, de::IgnoredAny};

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// Parse a raw filter value. Returns `None` for blank, zero, negative or
/// malformed input.
pub fn parse_id(raw: &str) -> Option<i64> {
  raw.trim().parse::<i64>().ok().and_then(positive)
}

fn positive(id: i64) -> Option<i64> { (id > 0).then_some(id) }

/// Any representation a filter id may take on the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
  Int(i64),
  Float(f64),
  Text(String),
  Other(IgnoredAny),
}

impl RawId {
  fn into_id(self) -> Option<i64> {
    match self {
      RawId::Int(v) => positive(v),
      RawId::Float(v) if v.fract() == 0.0 => positive(v as i64),
      RawId::Float(_) => None,
      RawId::Text(s) => parse_id(&s),
      RawId::Other(_) => None,
    }
  }
}

/// `deserialize_with` helper that never fails on a malformed id; it yields
/// `None` instead.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<RawId>::deserialize(deserializer)?;
  Ok(raw.and_then(RawId::into_id))
}

// ─── Filter ───────────────────────────────────────────────────────────────────

/// A sparse, strongly-typed question filter.
///
/// Deserialises directly from the listing endpoint's query string
/// (`gradeId`, `subjectId`, `lessonId`, `topicId`, `subtopicId`, `tutorId`,
/// `tuteId`); unknown keys such as `page` are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionFilter {
  #[serde(deserialize_with = "lenient_id")]
  pub grade_id:    Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub subject_id:  Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub lesson_id:   Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub topic_id:    Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub subtopic_id: Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub tutor_id:    Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub tute_id:     Option<i64>,
}

impl QuestionFilter {
  /// Drop any non-positive value that slipped in through direct
  /// construction, so `Some(0)` behaves exactly like `None`.
  pub fn normalized(self) -> Self {
    Self {
      grade_id:    self.grade_id.and_then(positive),
      subject_id:  self.subject_id.and_then(positive),
      lesson_id:   self.lesson_id.and_then(positive),
      topic_id:    self.topic_id.and_then(positive),
      subtopic_id: self.subtopic_id.and_then(positive),
      tutor_id:    self.tutor_id.and_then(positive),
      tute_id:     self.tute_id.and_then(positive),
    }
  }

  /// Build a filter from decoded query pairs. A repeated key keeps its first
  /// value, even when that value is malformed.
  pub fn from_pairs<'a, I>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut filter = Self::default();
    let mut seen = HashSet::new();
    for (key, value) in pairs {
      let slot = match key {
        "gradeId" => &mut filter.grade_id,
        "subjectId" => &mut filter.subject_id,
        "lessonId" => &mut filter.lesson_id,
        "topicId" => &mut filter.topic_id,
        "subtopicId" => &mut filter.subtopic_id,
        "tutorId" => &mut filter.tutor_id,
        "tuteId" => &mut filter.tute_id,
        _ => continue,
      };
      if seen.insert(key) {
        *slot = parse_id(value);
      }
    }
    filter
  }

  /// `true` when no dimension is applied.
  pub fn is_empty(&self) -> bool { self.normalized() == Self::default() }
}
