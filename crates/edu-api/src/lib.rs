//! JSON REST API for the educational catalog.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! [`edu_core::store`] traits. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", edu_api::api_router(store.clone()))
//! ```

pub mod admin;
pub mod catalog;
pub mod error;
pub mod questions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{MethodRouter, get, post},
};
use edu_core::{
  catalog::{Entity, Grade, Lesson, Subject, Subtopic, Topic, Tutor, Tutorial, Year},
  store::{CatalogStore, EntityStore, QuestionStore},
};

pub use error::ApiError;

/// Every store capability the API needs.
pub trait AppStore:
  QuestionStore
  + CatalogStore
  + EntityStore<Grade>
  + EntityStore<Subject>
  + EntityStore<Lesson>
  + EntityStore<Topic>
  + EntityStore<Subtopic>
  + EntityStore<Tutor>
  + EntityStore<Year>
  + EntityStore<Tutorial>
{
}

impl<S> AppStore for S where
  S: QuestionStore
    + CatalogStore
    + EntityStore<Grade>
    + EntityStore<Subject>
    + EntityStore<Lesson>
    + EntityStore<Topic>
    + EntityStore<Subtopic>
    + EntityStore<Tutor>
    + EntityStore<Year>
    + EntityStore<Tutorial>
{
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AppStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let router = Router::new()
    // Questions
    .route("/mcq/questions", get(questions::list::<S>).post(questions::create::<S>))
    .route(
      "/mcq/questions/{id}",
      get(questions::get_one::<S>)
        .put(questions::update::<S>)
        .delete(questions::delete::<S>),
    )
    // Public catalog
    .route("/grades", get(catalog::grades::<S>))
    .route("/subjects", get(catalog::subjects::<S>))
    .route("/lessons", get(catalog::lessons::<S>))
    .route("/tutor/topics", get(catalog::topics::<S>))
    .route("/note/smartnote", get(catalog::smart_note::<S>))
    // Curriculum links
    .route(
      "/admin/menu-config/grade-subjects",
      post(admin::link_grade_subject::<S>).delete(admin::unlink_grade_subject::<S>),
    )
    .route(
      "/admin/menu-config/grade-subject-lessons",
      post(admin::link_grade_subject_lesson::<S>)
        .delete(admin::unlink_grade_subject_lesson::<S>),
    )
    .route("/admin/menu-config/catalog", get(admin::catalog::<S>));

  // Admin CRUD
  let router = entity_routes::<S, Grade>(router, "grades");
  let router = entity_routes::<S, Subject>(router, "subjects");
  let router = entity_routes::<S, Lesson>(router, "lessons");
  let router = entity_routes::<S, Topic>(router, "topics");
  let router = entity_routes::<S, Subtopic>(router, "subtopics");
  let router = entity_routes::<S, Tutor>(router, "tutors");
  let router = entity_routes::<S, Year>(router, "years");
  let router = entity_routes::<S, Tutorial>(router, "tutorials");

  router.with_state(store)
}

fn entity_routes<S, E>(router: Router<Arc<S>>, collection: &str) -> Router<Arc<S>>
where
  S: EntityStore<E> + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  E: Entity,
{
  let collection_routes: MethodRouter<Arc<S>> =
    get(admin::list::<S, E>).post(admin::create::<S, E>);
  let item_routes: MethodRouter<Arc<S>> = get(admin::get_one::<S, E>)
    .put(admin::update::<S, E>)
    .delete(admin::delete::<S, E>);

  router
    .route(&format!("/admin/menu-config/{collection}"), collection_routes)
    .route(&format!("/admin/menu-config/{collection}/{{id}}"), item_routes)
}

#[cfg(test)]
mod tests;
