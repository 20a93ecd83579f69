//! SQLite backend for the educational catalog service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod catalog;
mod encode;
mod entity;
mod query;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use query::{QueryParts, resolve};
pub use store::SqliteStore;
