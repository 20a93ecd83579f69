//! Error types for `edu-core`.

use thiserror::Error;

use crate::catalog::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  /// Input failed validation; the message is safe to show to callers.
  #[error("{0}")]
  Invalid(String),

  /// A write referenced a parent row that does not exist.
  #[error("{0} not found")]
  ParentNotFound(EntityKind),

  #[error("{0} not found")]
  NotFound(String),

  #[error("{0} already linked")]
  AlreadyLinked(String),
}

impl Error {
  pub fn invalid(message: impl Into<String>) -> Self {
    Self::Invalid(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
