//! HTTP server assembly for the educational catalog service.
//!
//! Wraps [`edu_api::api_router`] under `/api/v1`, adds `/health`, and layers
//! request tracing and CORS on top.

pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  http::{HeaderValue, Method, header},
  response::IntoResponse,
  routing::get,
};
use edu_api::AppStore;
use serde::Deserialize;
use serde_json::json;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `EDU_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub database_path:   PathBuf,
  pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "0.0.0.0".to_string(),
      port:            8080,
      database_path:   PathBuf::from("edu.sqlite3"),
      allowed_origins: vec!["http://localhost:3000".to_string()],
    }
  }
}

/// Preflight responses may be cached for this long.
const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, Error> {
  let origins = config
    .allowed_origins
    .iter()
    .map(|origin| {
      HeaderValue::from_str(origin).map_err(|source| Error::InvalidOrigin {
        origin: origin.clone(),
        source,
      })
    })
    .collect::<Result<Vec<_>, _>>()?;

  Ok(
    CorsLayer::new()
      .allow_origin(AllowOrigin::list(origins))
      .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
      ])
      .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
      .expose_headers([header::CONTENT_LENGTH])
      .max_age(CORS_MAX_AGE),
  )
}

// ─── Router ───────────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse { Json(json!({ "status": "ok" })) }

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> Result<Router, Error>
where
  S: AppStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(
    Router::new()
      .route("/health", get(health))
      .nest("/api/v1", edu_api::api_router(store))
      .layer(cors_layer(config)?)
      .layer(TraceLayer::new_for_http()),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────
