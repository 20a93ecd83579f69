//! Generic CRUD for the admin-editable catalog entities.
//!
//! Each entity describes its table once through [`SqlEntity`]; a single
//! blanket impl then provides [`EntityStore`] for all of them.

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row, params_from_iter, types::Value};

use edu_core::{
  catalog::{
    CatalogQuery, Entity, EntityKind, Grade, GradeUpsert, Lesson, LessonUpsert,
    ParentRef, Subject, SubjectUpsert, Subtopic, SubtopicUpsert, Topic,
    TopicUpsert, Tutor, TutorUpsert, Tutorial, TutorialUpsert, Upsert, Year,
    YearUpsert,
  },
  page::Page,
  store::EntityStore,
};

use crate::{Result, encode::{encode_dt, read_dt}, store::SqliteStore};

// ─── Table mapping ───────────────────────────────────────────────────────────

/// How one entity maps onto its table. Queries alias the table as `t`.
pub trait SqlEntity: Entity {
  const TABLE: &'static str;

  /// Selected columns, in the order [`SqlEntity::from_row`] reads them.
  const COLUMNS: &'static str;

  /// Columns written by create and update, in the order
  /// [`SqlEntity::bind`] yields values.
  const WRITE_COLUMNS: &'static [&'static str];

  /// Expression matched by the admin `search` term.
  const SEARCH_EXPR: &'static str = "t.name";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

  fn bind(input: &Self::Upsert) -> Vec<Value>;

  /// Scope conditions (one `?` each) for the ids in `query` that apply to
  /// this entity.
  fn scope(_query: &CatalogQuery) -> Vec<(&'static str, i64)> { Vec::new() }
}

pub(crate) fn table_for(kind: EntityKind) -> &'static str {
  match kind {
    EntityKind::Grade => Grade::TABLE,
    EntityKind::Subject => Subject::TABLE,
    EntityKind::Lesson => Lesson::TABLE,
    EntityKind::Topic => Topic::TABLE,
    EntityKind::Subtopic => Subtopic::TABLE,
    EntityKind::Tutor => Tutor::TABLE,
    EntityKind::Year => Year::TABLE,
    EntityKind::Tutorial => Tutorial::TABLE,
  }
}

pub(crate) fn exists(
  conn: &rusqlite::Connection,
  kind: EntityKind,
  id: i64,
) -> rusqlite::Result<bool> {
  conn.query_row(
    &format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = ?1)", table_for(kind)),
    [id],
    |r| r.get(0),
  )
}

fn select_one<E: SqlEntity>(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<E>> {
  conn
    .query_row(
      &format!("SELECT {} FROM {} t WHERE t.id = ?1", E::COLUMNS, E::TABLE),
      [id],
      E::from_row,
    )
    .optional()
}

/// Every row of `E`, ascending by id.
pub(crate) fn select_all<E: SqlEntity>(
  conn: &rusqlite::Connection,
  condition: Option<&str>,
  params: &[i64],
) -> rusqlite::Result<Vec<E>> {
  let filter = condition.map(|c| format!(" WHERE {c}")).unwrap_or_default();
  let sql = format!("SELECT {} FROM {} t{filter} ORDER BY t.id", E::COLUMNS, E::TABLE);
  conn
    .prepare(&sql)?
    .query_map(params_from_iter(params), E::from_row)?
    .collect()
}

fn text(s: &str) -> Value { Value::Text(s.trim().to_owned()) }

/// Optional text: blank is stored as NULL.
fn opt_text(s: &Option<String>) -> Value {
  match s.as_deref().map(str::trim) {
    Some(v) if !v.is_empty() => Value::Text(v.to_owned()),
    _ => Value::Null,
  }
}

fn scoped(pairs: &[(&'static str, Option<i64>)]) -> Vec<(&'static str, i64)> {
  pairs
    .iter()
    .filter_map(|(cond, id)| id.filter(|id| *id > 0).map(|id| (*cond, id)))
    .collect()
}

/// Parent check run inside a write closure.
fn check_parent(
  conn: &rusqlite::Connection,
  parent: Option<ParentRef>,
) -> rusqlite::Result<Option<edu_core::Error>> {
  match parent {
    Some(p) if !exists(conn, p.kind, p.id)? => {
      Ok(Some(edu_core::Error::ParentNotFound(p.kind)))
    }
    _ => Ok(None),
  }
}

// ─── Blanket impl ────────────────────────────────────────────────────────────

impl<E: SqlEntity> EntityStore<E> for SqliteStore {
  async fn list_entities(&self, query: CatalogQuery) -> Result<Page<E>> {
    let mut conds: Vec<String> = vec![];
    let mut params: Vec<Value> = vec![];
    if let Some(term) = query.search_term() {
      conds.push(format!("{} LIKE ?", E::SEARCH_EXPR));
      params.push(Value::Text(format!("%{term}%")));
    }
    for (cond, id) in E::scope(&query) {
      conds.push(cond.to_owned());
      params.push(Value::Integer(id));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!(" WHERE {}", conds.join(" AND "))
    };
    let list_sql = format!(
      "SELECT {} FROM {} t{where_clause} ORDER BY t.id DESC LIMIT ? OFFSET ?",
      E::COLUMNS,
      E::TABLE,
    );
    let count_sql = format!("SELECT COUNT(*) FROM {} t{where_clause}", E::TABLE);
    tracing::debug!(sql = %list_sql, entity = %E::KIND, "listing entities");

    let page = query.page;
    let mut window = params.clone();
    window.push(Value::Integer(page.limit() as i64));
    window.push(Value::Integer(page.offset() as i64));

    let (rows, total): (Vec<E>, i64) = self
      .conn
      .call(move |conn| {
        let rows = conn
          .prepare(&list_sql)?
          .query_map(params_from_iter(window), E::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let total = conn.query_row(&count_sql, params_from_iter(params), |r| r.get(0))?;
        Ok((rows, total))
      })
      .await?;

    Ok(Page::new(rows, page, total.max(0) as u64))
  }

  async fn get_entity(&self, id: i64) -> Result<Option<E>> {
    Ok(self.conn.call(move |conn| Ok(select_one::<E>(conn, id)?)).await?)
  }

  async fn create_entity(&self, input: E::Upsert) -> Result<E> {
    input.validate()?;
    let parent = input.parent();
    let mut values = E::bind(&input);
    values.push(Value::Text(encode_dt(Utc::now())));

    let placeholders = vec!["?"; values.len()].join(", ");
    let sql = format!(
      "INSERT INTO {} ({}, created_at) VALUES ({placeholders})",
      E::TABLE,
      E::WRITE_COLUMNS.join(", "),
    );

    let created = self
      .conn
      .call(move |conn| {
        if let Some(err) = check_parent(conn, parent)? {
          return Ok(Err(err));
        }
        conn.execute(&sql, params_from_iter(values))?;
        let id = conn.last_insert_rowid();
        Ok(select_one::<E>(conn, id)?.ok_or_else(|| {
          edu_core::Error::NotFound(E::KIND.label().to_owned())
        }))
      })
      .await??;

    tracing::debug!(entity = %E::KIND, "created entity");
    Ok(created)
  }

  async fn update_entity(&self, id: i64, input: E::Upsert) -> Result<Option<E>> {
    input.validate()?;
    let parent = input.parent();
    let mut values = E::bind(&input);
    values.push(Value::Integer(id));

    let assignments = E::WRITE_COLUMNS
      .iter()
      .map(|col| format!("{col} = ?"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!("UPDATE {} SET {assignments} WHERE id = ?", E::TABLE);

    let updated = self
      .conn
      .call(move |conn| {
        if let Some(err) = check_parent(conn, parent)? {
          return Ok(Err(err));
        }
        if conn.execute(&sql, params_from_iter(values))? == 0 {
          return Ok(Ok(None));
        }
        Ok(Ok(select_one::<E>(conn, id)?))
      })
      .await??;

    Ok(updated)
  }

  async fn delete_entity(&self, id: i64) -> Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
    let changed = self.conn.call(move |conn| Ok(conn.execute(&sql, [id])?)).await?;
    Ok(changed > 0)
  }
}

// ─── Entities ────────────────────────────────────────────────────────────────

impl SqlEntity for Grade {
  const TABLE: &'static str = "grades";
  const COLUMNS: &'static str = "t.id, t.name, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["name"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, name: row.get(1)?, created_at: read_dt(row, 2)? })
  }

  fn bind(input: &GradeUpsert) -> Vec<Value> { vec![text(&input.name)] }
}

impl SqlEntity for Subject {
  const TABLE: &'static str = "subjects";
  const COLUMNS: &'static str = "t.id, t.grade_id, t.name, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["grade_id", "name"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      grade_id:   row.get(1)?,
      name:       row.get(2)?,
      created_at: read_dt(row, 3)?,
    })
  }

  fn bind(input: &SubjectUpsert) -> Vec<Value> {
    vec![Value::Integer(input.grade_id), text(&input.name)]
  }

  fn scope(query: &CatalogQuery) -> Vec<(&'static str, i64)> {
    scoped(&[("t.grade_id = ?", query.grade_id)])
  }
}

impl SqlEntity for Lesson {
  const TABLE: &'static str = "lessons";
  const COLUMNS: &'static str = "t.id, t.subject_id, t.name, t.image_url, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["subject_id", "name", "image_url"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      subject_id: row.get(1)?,
      name:       row.get(2)?,
      image_url:  row.get(3)?,
      created_at: read_dt(row, 4)?,
    })
  }

  fn bind(input: &LessonUpsert) -> Vec<Value> {
    vec![
      Value::Integer(input.subject_id),
      text(&input.name),
      opt_text(&input.image_url),
    ]
  }

  fn scope(query: &CatalogQuery) -> Vec<(&'static str, i64)> {
    scoped(&[
      (
        "EXISTS (SELECT 1 FROM grade_subjects gs \
         WHERE gs.subject_id = t.subject_id AND gs.grade_id = ?)",
        query.grade_id,
      ),
      ("t.subject_id = ?", query.subject_id),
    ])
  }
}

impl SqlEntity for Topic {
  const TABLE: &'static str = "topics";
  const COLUMNS: &'static str = "t.id, t.lesson_id, t.name, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["lesson_id", "name"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      lesson_id:  row.get(1)?,
      name:       row.get(2)?,
      created_at: read_dt(row, 3)?,
    })
  }

  fn bind(input: &TopicUpsert) -> Vec<Value> {
    vec![Value::Integer(input.lesson_id), text(&input.name)]
  }

  fn scope(query: &CatalogQuery) -> Vec<(&'static str, i64)> {
    scoped(&[("t.lesson_id = ?", query.lesson_id)])
  }
}

impl SqlEntity for Subtopic {
  const TABLE: &'static str = "subtopics";
  const COLUMNS: &'static str = "t.id, t.topic_id, t.name, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["topic_id", "name"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      topic_id:   row.get(1)?,
      name:       row.get(2)?,
      created_at: read_dt(row, 3)?,
    })
  }

  fn bind(input: &SubtopicUpsert) -> Vec<Value> {
    vec![Value::Integer(input.topic_id), text(&input.name)]
  }

  fn scope(query: &CatalogQuery) -> Vec<(&'static str, i64)> {
    scoped(&[("t.topic_id = ?", query.topic_id)])
  }
}

impl SqlEntity for Tutor {
  const TABLE: &'static str = "tutors";
  const COLUMNS: &'static str = "t.id, t.name, t.email, t.phone, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["name", "email", "phone"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      phone:      row.get(3)?,
      created_at: read_dt(row, 4)?,
    })
  }

  fn bind(input: &TutorUpsert) -> Vec<Value> {
    vec![text(&input.name), opt_text(&input.email), opt_text(&input.phone)]
  }
}

impl SqlEntity for Year {
  const TABLE: &'static str = "years";
  const COLUMNS: &'static str = "t.id, t.value, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["value"];
  const SEARCH_EXPR: &'static str = "CAST(t.value AS TEXT)";

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { id: row.get(0)?, value: row.get(1)?, created_at: read_dt(row, 2)? })
  }

  fn bind(input: &YearUpsert) -> Vec<Value> { vec![Value::Integer(input.value.into())] }
}

impl SqlEntity for Tutorial {
  const TABLE: &'static str = "tutorials";
  const COLUMNS: &'static str = "t.id, t.name, t.url, t.created_at";
  const WRITE_COLUMNS: &'static [&'static str] = &["name", "url"];

  fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      url:        row.get(2)?,
      created_at: read_dt(row, 3)?,
    })
  }

  fn bind(input: &TutorialUpsert) -> Vec<Value> {
    vec![text(&input.name), opt_text(&input.url)]
  }
}
