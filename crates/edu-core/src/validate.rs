//! Input validators shared by question writes and catalog upserts.

use crate::{Error, Result};

pub const MAX_NAME_LEN: usize = 120;
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// A name must be non-blank and at most [`MAX_NAME_LEN`] characters once
/// trimmed.
pub fn name(value: &str) -> Result<()> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::invalid("name is required"));
  }
  if trimmed.chars().count() > MAX_NAME_LEN {
    return Err(Error::invalid(format!(
      "name must be at most {MAX_NAME_LEN} characters"
    )));
  }
  Ok(())
}

/// A required reference, named by its wire field (e.g. `"gradeId"`).
pub fn required_id(field: &str, id: i64) -> Result<()> {
  if id <= 0 {
    return Err(Error::invalid(format!("{field} is required")));
  }
  Ok(())
}

pub fn year(value: i32) -> Result<()> {
  if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
    return Err(Error::invalid(format!(
      "value must be between {MIN_YEAR} and {MAX_YEAR}"
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names() {
    assert!(name("Grade 6").is_ok());
    assert!(name("   ").is_err());
    assert!(name(&"x".repeat(MAX_NAME_LEN)).is_ok());
    assert!(name(&format!("  {}  ", "x".repeat(MAX_NAME_LEN))).is_ok());
    assert!(name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
  }

  #[test]
  fn ids_and_years() {
    assert_eq!(
      required_id("gradeId", 0).unwrap_err().to_string(),
      "gradeId is required"
    );
    assert!(required_id("gradeId", 3).is_ok());
    assert!(year(1899).is_err());
    assert!(year(2024).is_ok());
    assert!(year(2101).is_err());
  }
}
