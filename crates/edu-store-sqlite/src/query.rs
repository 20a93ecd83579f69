//! Question filter resolution.
//!
//! [`resolve`] turns a [`QuestionFilter`] into the joins, conditions and
//! bound parameters of one predicate over `questions q`. The windowed list
//! and the total count are both rendered from the same [`QueryParts`], so
//! they can never disagree about which rows match.
//!
//! Hierarchy rules:
//!
//! | lesson | grade | subject | predicate                                         |
//! |--------|-------|---------|---------------------------------------------------|
//! | set    | any   | any     | `lesson_id = ?`                                   |
//! | –      | –     | –       | none                                              |
//! | –      | set   | –       | unscoped by own grade, or scoped and linked to grade |
//! | –      | –     | set     | scoped and the lesson's subject matches           |
//! | –      | set   | set     | unscoped by own grade, or scoped and linked to the pair |
//!
//! Topic, subtopic, tutor and tute are plain equality filters appended in
//! that order.

use edu_core::filter::QuestionFilter;

use crate::encode::QUESTION_COLUMNS;

/// `lesson_id` unset: stored as NULL or 0.
const UNSCOPED: &str = "(q.lesson_id IS NULL OR q.lesson_id = 0)";
/// The negation of [`UNSCOPED`].
const SCOPED: &str = "(q.lesson_id IS NOT NULL AND q.lesson_id <> 0)";

const LESSON_JOIN: &str = "JOIN lessons l ON l.id = q.lesson_id";

/// One resolved predicate. `params` binds the `?` placeholders of `joins`
/// and `conditions` left to right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParts {
  pub joins:      Vec<&'static str>,
  pub conditions: Vec<String>,
  pub params:     Vec<i64>,
}

impl QueryParts {
  fn push(&mut self, condition: impl Into<String>, params: &[i64]) {
    self.conditions.push(condition.into());
    self.params.extend_from_slice(params);
  }

  fn from_clause(&self) -> String {
    let mut from = String::from("FROM questions q");
    for join in &self.joins {
      from.push(' ');
      from.push_str(join);
    }
    if !self.conditions.is_empty() {
      from.push_str(" WHERE ");
      from.push_str(&self.conditions.join(" AND "));
    }
    from
  }

  /// Windowed select, newest first. Binds `params` followed by
  /// `LIMIT ? OFFSET ?`.
  pub fn list_sql(&self) -> String {
    format!(
      "SELECT {QUESTION_COLUMNS} {} ORDER BY q.id DESC LIMIT ? OFFSET ?",
      self.from_clause()
    )
  }

  /// Total matches ignoring any window. Binds `params` only.
  pub fn count_sql(&self) -> String {
    format!("SELECT COUNT(*) {}", self.from_clause())
  }
}

/// Build the predicate for `filter`. Pure: no I/O, no logging.
pub fn resolve(filter: QuestionFilter) -> QueryParts {
  let mut parts = QueryParts::default();
  if filter.is_empty() {
    return parts;
  }
  let f = filter.normalized();

  match (f.lesson_id, f.grade_id, f.subject_id) {
    (Some(lesson), _, _) => parts.push("q.lesson_id = ?", &[lesson]),
    (None, None, None) => {}
    (None, Some(grade), None) => parts.push(
      format!(
        "(({UNSCOPED} AND q.grade_id = ?) OR ({SCOPED} AND EXISTS (\
           SELECT 1 FROM grade_subject_lessons gsl \
           WHERE gsl.lesson_id = q.lesson_id AND gsl.grade_id = ?)))"
      ),
      &[grade, grade],
    ),
    (None, None, Some(subject)) => {
      parts.joins.push(LESSON_JOIN);
      parts.push(format!("{SCOPED} AND l.subject_id = ?"), &[subject]);
    }
    (None, Some(grade), Some(subject)) => parts.push(
      format!(
        "(({UNSCOPED} AND q.grade_id = ?) OR ({SCOPED} AND EXISTS (\
           SELECT 1 FROM grade_subject_lessons gsl \
           WHERE gsl.lesson_id = q.lesson_id AND gsl.grade_id = ? \
           AND gsl.subject_id = ?)))"
      ),
      &[grade, grade, subject],
    ),
  }

  let equalities = [
    ("q.topic_id = ?", f.topic_id),
    ("q.subtopic_id = ?", f.subtopic_id),
    ("q.tutor_id = ?", f.tutor_id),
    ("q.tute_id = ?", f.tute_id),
  ];
  for (condition, value) in equalities {
    if let Some(id) = value {
      parts.push(condition, &[id]);
    }
  }

  parts
}

#[cfg(test)]
mod tests {
  use super::*;

  fn placeholders(sql: &str) -> usize { sql.matches('?').count() }

  #[test]
  fn empty_filter_has_no_predicate() {
    let parts = resolve(QuestionFilter::default());
    assert_eq!(parts, QueryParts::default());
    assert_eq!(parts.count_sql(), "SELECT COUNT(*) FROM questions q");
  }

  #[test]
  fn lesson_takes_precedence() {
    let parts = resolve(QuestionFilter {
      grade_id: Some(1),
      subject_id: Some(2),
      lesson_id: Some(10),
      ..Default::default()
    });
    assert_eq!(parts.conditions, vec!["q.lesson_id = ?".to_owned()]);
    assert_eq!(parts.params, vec![10]);
    assert!(parts.joins.is_empty());
  }

  #[test]
  fn grade_only_binds_grade_twice() {
    let parts = resolve(QuestionFilter { grade_id: Some(3), ..Default::default() });
    assert_eq!(parts.params, vec![3, 3]);
    assert!(parts.joins.is_empty());
    assert!(parts.conditions[0].contains("grade_subject_lessons"));
    assert!(!parts.conditions[0].contains("gsl.subject_id"));
  }

  #[test]
  fn subject_only_joins_lessons() {
    let parts = resolve(QuestionFilter { subject_id: Some(2), ..Default::default() });
    assert_eq!(parts.joins, vec![LESSON_JOIN]);
    assert_eq!(parts.params, vec![2]);
    assert!(parts.conditions[0].contains(SCOPED));
  }

  #[test]
  fn grade_and_subject_use_the_pair_link() {
    let parts = resolve(QuestionFilter {
      grade_id: Some(1),
      subject_id: Some(2),
      ..Default::default()
    });
    assert_eq!(parts.params, vec![1, 1, 2]);
    assert!(parts.joins.is_empty());
    assert!(parts.conditions[0].contains("gsl.subject_id = ?"));
  }

  #[test]
  fn equality_filters_follow_in_fixed_order() {
    let parts = resolve(QuestionFilter {
      grade_id: Some(1),
      tute_id: Some(7),
      topic_id: Some(4),
      tutor_id: Some(6),
      subtopic_id: Some(5),
      ..Default::default()
    });
    assert_eq!(parts.params, vec![1, 1, 4, 5, 6, 7]);
    assert_eq!(
      &parts.conditions[1..],
      &["q.topic_id = ?", "q.subtopic_id = ?", "q.tutor_id = ?", "q.tute_id = ?"]
    );
  }

  #[test]
  fn placeholders_match_params() {
    let filters = [
      QuestionFilter { grade_id: Some(1), topic_id: Some(2), ..Default::default() },
      QuestionFilter { subject_id: Some(1), tutor_id: Some(2), ..Default::default() },
      QuestionFilter { grade_id: Some(1), subject_id: Some(2), tute_id: Some(3), ..Default::default() },
      QuestionFilter { lesson_id: Some(1), subtopic_id: Some(2), ..Default::default() },
    ];
    for filter in filters {
      let parts = resolve(filter);
      assert_eq!(placeholders(&parts.count_sql()), parts.params.len());
      assert_eq!(placeholders(&parts.list_sql()), parts.params.len() + 2);
    }
  }

  #[test]
  fn zero_values_resolve_like_absent_ones() {
    let zeros = QuestionFilter {
      grade_id: Some(0),
      subject_id: Some(0),
      lesson_id: Some(0),
      topic_id: Some(-1),
      ..Default::default()
    };
    assert!(zeros.is_empty());
    assert_eq!(resolve(zeros), QueryParts::default());
  }
}
