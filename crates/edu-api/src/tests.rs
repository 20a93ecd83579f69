//! HTTP tests driving [`api_router`] over an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use edu_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use super::*;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn oneshot_raw(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(json) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(json.to_string())
    }
    None => Body::empty(),
  };
  app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

/// Send a request and decode the JSON reply, asserting on its status.
async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>, status: StatusCode) -> Value {
  let resp = oneshot_raw(app, method, uri, body).await;
  assert_eq!(resp.status(), status, "{method} {uri}");
  json_body(resp).await
}

async fn create(app: &Router, collection: &str, body: Value) -> i64 {
  let created = call(
    app,
    "POST",
    &format!("/admin/menu-config/{collection}"),
    Some(body),
    StatusCode::CREATED,
  )
  .await;
  created["id"].as_i64().unwrap()
}

async fn create_question(app: &Router, body: Value) -> i64 {
  call(app, "POST", "/mcq/questions", Some(body), StatusCode::CREATED).await["id"]
    .as_i64()
    .unwrap()
}

fn ids(page: &Value) -> Vec<i64> {
  page["data"]
    .as_array()
    .unwrap()
    .iter()
    .map(|q| q["id"].as_i64().unwrap())
    .collect()
}

// ── Questions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn question_listing_resolves_the_hierarchy() {
  let app = app().await;
  let g1 = create(&app, "grades", json!({ "name": "Grade 1" })).await;
  let g3 = create(&app, "grades", json!({ "name": "Grade 3" })).await;
  let s = create(&app, "subjects", json!({ "gradeId": g1, "name": "Maths" })).await;
  let lb = create(&app, "lessons", json!({ "subjectId": s, "name": "Counting" })).await;
  let lc = create(&app, "lessons", json!({ "subjectId": s, "name": "Fractions" })).await;

  for g in [g1, g3] {
    call(&app, "POST", "/admin/menu-config/grade-subjects",
      Some(json!({ "gradeId": g, "subjectId": s })), StatusCode::CREATED).await;
  }
  call(&app, "POST", "/admin/menu-config/grade-subject-lessons",
    Some(json!({ "gradeId": g1, "subjectId": s, "lessonId": lb })), StatusCode::CREATED).await;
  call(&app, "POST", "/admin/menu-config/grade-subject-lessons",
    Some(json!({ "gradeId": g3, "subjectId": s, "lessonId": lc })), StatusCode::CREATED).await;

  let a = create_question(&app, json!({ "gradeId": g1, "lessonId": 0, "question": "A", "correctAnswer": "x" })).await;
  let b = create_question(&app, json!({ "gradeId": g1, "lessonId": lb, "question": "B", "correctAnswer": "x" })).await;
  let c = create_question(&app, json!({ "gradeId": g1, "lessonId": lc, "question": "C", "correctAnswer": "x" })).await;

  let page = call(&app, "GET", &format!("/mcq/questions?gradeId={g1}"), None, StatusCode::OK).await;
  assert_eq!(ids(&page), vec![b, a]);
  assert_eq!(page["totalCount"], 2);

  let page = call(&app, "GET", &format!("/mcq/questions?subjectId={s}"), None, StatusCode::OK).await;
  assert_eq!(ids(&page), vec![c, b]);

  let page = call(&app, "GET", &format!("/mcq/questions?gradeId={g1}&subjectId={s}"), None, StatusCode::OK).await;
  assert_eq!(ids(&page), vec![b, a]);

  // Blank, zero and garbage values are ignored.
  let page = call(&app, "GET", "/mcq/questions?gradeId=&subjectId=0&lessonId=abc", None, StatusCode::OK).await;
  assert_eq!(ids(&page), vec![c, b, a]);
}

#[tokio::test]
async fn question_listing_pages_permissively() {
  let app = app().await;
  let g = create(&app, "grades", json!({ "name": "G" })).await;
  for i in 0..5 {
    create_question(&app, json!({ "gradeId": g, "question": format!("Q{i}") })).await;
  }

  let page = call(&app, "GET", "/mcq/questions?page=2&pageSize=2", None, StatusCode::OK).await;
  assert_eq!(page["page"], 2);
  assert_eq!(page["pageSize"], 2);
  assert_eq!(page["totalCount"], 5);
  assert_eq!(page["data"].as_array().unwrap().len(), 2);

  let page = call(&app, "GET", "/mcq/questions?page=zero&pageSize=-4", None, StatusCode::OK).await;
  assert_eq!(page["page"], 1);
  assert_eq!(page["pageSize"], 10);

  let page = call(&app, "GET", "/mcq/questions?pageSize=1000", None, StatusCode::OK).await;
  assert_eq!(page["pageSize"], 100);
}

#[tokio::test]
async fn repeated_listing_keys_use_the_first_value() {
  let app = app().await;
  let g1 = create(&app, "grades", json!({ "name": "G1" })).await;
  let g2 = create(&app, "grades", json!({ "name": "G2" })).await;
  let a = create_question(&app, json!({ "gradeId": g1, "question": "A" })).await;
  let b = create_question(&app, json!({ "gradeId": g2, "question": "B" })).await;

  let uri = format!("/mcq/questions?gradeId={g1}&gradeId={g2}");
  let page = call(&app, "GET", &uri, None, StatusCode::OK).await;
  assert_eq!(ids(&page), vec![a]);

  let uri = format!("/mcq/questions?gradeId={g2}&gradeId={g1}&page=1&page=9&pageSize=5");
  let page = call(&app, "GET", &uri, None, StatusCode::OK).await;
  assert_eq!(ids(&page), vec![b]);
  assert_eq!(page["page"], 1);
  assert_eq!(page["pageSize"], 5);
}

#[tokio::test]
async fn question_crud_round_trip() {
  let app = app().await;
  let g = create(&app, "grades", json!({ "name": "G" })).await;

  let body = call(&app, "POST", "/mcq/questions",
    Some(json!({ "question": "no grade" })), StatusCode::BAD_REQUEST).await;
  assert_eq!(body["error"], "gradeId is required");

  let id = create_question(&app, json!({
    "gradeId": g, "question": "2 + 2", "correctAnswer": "4", "otherAnswers": ["3", "5"]
  }))
  .await;

  let q = call(&app, "GET", &format!("/mcq/questions/{id}"), None, StatusCode::OK).await;
  assert_eq!(q["otherAnswers"], json!(["3", "5"]));
  assert_eq!(q["lessonId"], Value::Null);

  let q = call(&app, "PUT", &format!("/mcq/questions/{id}"),
    Some(json!({ "gradeId": g, "question": "3 + 3", "correctAnswer": "6" })), StatusCode::OK).await;
  assert_eq!(q["question"], "3 + 3");

  call(&app, "PUT", &format!("/mcq/questions/{}", id + 1),
    Some(json!({ "gradeId": g, "question": "x" })), StatusCode::NOT_FOUND).await;

  let resp = oneshot_raw(&app, "DELETE", &format!("/mcq/questions/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  call(&app, "GET", &format!("/mcq/questions/{id}"), None, StatusCode::NOT_FOUND).await;
  call(&app, "DELETE", &format!("/mcq/questions/{id}"), None, StatusCode::NOT_FOUND).await;
}

// ── Admin ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_validation_and_parents() {
  let app = app().await;

  let body = call(&app, "POST", "/admin/menu-config/grades",
    Some(json!({ "name": "   " })), StatusCode::BAD_REQUEST).await;
  assert_eq!(body["error"], "name is required");

  let body = call(&app, "POST", "/admin/menu-config/subjects",
    Some(json!({ "gradeId": 99, "name": "Maths" })), StatusCode::BAD_REQUEST).await;
  assert_eq!(body["error"], "grade not found");

  call(&app, "POST", "/admin/menu-config/years",
    Some(json!({ "value": 1800 })), StatusCode::BAD_REQUEST).await;

  call(&app, "GET", "/admin/menu-config/grades?page=abc", None, StatusCode::BAD_REQUEST).await;
  call(&app, "GET", "/admin/menu-config/grades/5", None, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn admin_entity_lifecycle() {
  let app = app().await;
  let id = create(&app, "tutors", json!({ "name": " Ada ", "email": "ada@example.com" })).await;
  create(&app, "tutors", json!({ "name": "Grace" })).await;

  let page = call(&app, "GET", "/admin/menu-config/tutors?search=ad&page=1&pageSize=5", None, StatusCode::OK).await;
  assert_eq!(page["totalCount"], 1);
  assert_eq!(page["data"][0]["name"], "Ada");
  assert_eq!(page["pageSize"], 5);

  let updated = call(&app, "PUT", &format!("/admin/menu-config/tutors/{id}"),
    Some(json!({ "name": "Ada L." })), StatusCode::OK).await;
  assert_eq!(updated["name"], "Ada L.");
  assert_eq!(updated["email"], Value::Null);

  let resp = oneshot_raw(&app, "DELETE", &format!("/admin/menu-config/tutors/{id}"), None).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  call(&app, "DELETE", &format!("/admin/menu-config/tutors/{id}"), None, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn links_conflict_and_unlink() {
  let app = app().await;
  let g = create(&app, "grades", json!({ "name": "G" })).await;
  let s = create(&app, "subjects", json!({ "gradeId": g, "name": "S" })).await;
  let link = json!({ "gradeId": g, "subjectId": s });

  call(&app, "POST", "/admin/menu-config/grade-subjects",
    Some(json!({ "gradeId": g + 5, "subjectId": s })), StatusCode::NOT_FOUND).await;
  call(&app, "POST", "/admin/menu-config/grade-subjects",
    Some(json!({ "subjectId": s })), StatusCode::BAD_REQUEST).await;
  call(&app, "POST", "/admin/menu-config/grade-subjects", Some(link.clone()), StatusCode::CREATED).await;
  call(&app, "POST", "/admin/menu-config/grade-subjects", Some(link.clone()), StatusCode::CONFLICT).await;

  let catalog = call(&app, "GET", "/admin/menu-config/catalog", None, StatusCode::OK).await;
  assert_eq!(catalog["gradeSubjects"].as_array().unwrap().len(), 1);

  let resp = oneshot_raw(&app, "DELETE", "/admin/menu-config/grade-subjects", Some(link.clone())).await;
  assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  call(&app, "DELETE", "/admin/menu-config/grade-subjects", Some(link), StatusCode::NOT_FOUND).await;
}

// ── Public reads ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn public_catalog_reads() {
  let app = app().await;
  let g = create(&app, "grades", json!({ "name": "G" })).await;
  let s = create(&app, "subjects", json!({ "gradeId": g, "name": "S" })).await;
  let l = create(&app, "lessons", json!({ "subjectId": s, "name": "L" })).await;
  let t = create(&app, "topics", json!({ "lessonId": l, "name": "T" })).await;
  create(&app, "subtopics", json!({ "topicId": t, "name": "ST" })).await;

  let grades = call(&app, "GET", "/grades", None, StatusCode::OK).await;
  assert_eq!(grades.as_array().unwrap().len(), 1);

  let subjects = call(&app, "GET", &format!("/subjects?gradeId={g}"), None, StatusCode::OK).await;
  assert_eq!(subjects[0]["id"], s);
  call(&app, "GET", "/subjects", None, StatusCode::BAD_REQUEST).await;
  call(&app, "GET", "/subjects?gradeId=abc", None, StatusCode::BAD_REQUEST).await;

  let lessons = call(&app, "GET", &format!("/lessons?subject={s}"), None, StatusCode::OK).await;
  assert_eq!(lessons[0]["name"], "L");

  let topics = call(&app, "GET", &format!("/tutor/topics?lessonId={l}"), None, StatusCode::OK).await;
  assert_eq!(topics["topics"][0]["topicName"], "T");
  assert_eq!(topics["topics"][0]["subTopicList"][0]["subTopicName"], "ST");
  assert_eq!(topics["defaultSmartNote"], Value::Null);

  let note = format!("/note/smartnote?gradeId={g}&subjectId={s}&lessonId={l}");
  call(&app, "GET", &note, None, StatusCode::NOT_FOUND).await;

  let body = call(&app, "GET", &format!("{note}&topicId=abc"), None, StatusCode::BAD_REQUEST).await;
  assert_eq!(body["error"], "invalid topicId");
  let body =
    call(&app, "GET", &format!("{note}&subtopicId=1x"), None, StatusCode::BAD_REQUEST).await;
  assert_eq!(body["error"], "invalid subtopicId");
}
