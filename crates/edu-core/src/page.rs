//! Page-window policy shared by every paginated listing.
//!
//! `page` is 1-based. Out-of-range values are coerced rather than rejected:
//! `page < 1` becomes 1, `page_size < 1` becomes [`DEFAULT_PAGE_SIZE`], and
//! `page_size` is capped at [`MAX_PAGE_SIZE`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page:      u32,
  page_size: u32,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
  }
}

impl PageRequest {
  /// Build a window from raw numbers, coercing out-of-range values.
  pub fn new(page: i64, page_size: i64) -> Self {
    let page = if page < 1 { 1 } else { page.min(u32::MAX as i64) as u32 };
    let page_size = if page_size < 1 {
      DEFAULT_PAGE_SIZE
    } else {
      page_size.min(MAX_PAGE_SIZE as i64) as u32
    };
    Self { page, page_size }
  }

  /// Strict parse: blank or missing values take the defaults, anything else
  /// must be an integer.
  pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Result<Self> {
    let page = parse_number(page, 1)
      .ok_or_else(|| Error::invalid("invalid page parameter"))?;
    let page_size = parse_number(page_size, DEFAULT_PAGE_SIZE as i64)
      .ok_or_else(|| Error::invalid("invalid pageSize parameter"))?;
    Ok(Self::new(page, page_size))
  }

  /// Permissive parse: malformed values silently fall back to the defaults.
  pub fn parse_lenient(page: Option<&str>, page_size: Option<&str>) -> Self {
    Self::new(
      parse_number(page, 1).unwrap_or(1),
      parse_number(page_size, DEFAULT_PAGE_SIZE as i64)
        .unwrap_or(DEFAULT_PAGE_SIZE as i64),
    )
  }

  pub fn page(&self) -> u32 { self.page }

  pub fn page_size(&self) -> u32 { self.page_size }

  /// Rows to skip: `(page - 1) * page_size`.
  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.page_size)
  }

  pub fn limit(&self) -> u64 { u64::from(self.page_size) }
}

fn parse_number(raw: Option<&str>, default: i64) -> Option<i64> {
  match raw.map(str::trim) {
    None | Some("") => Some(default),
    Some(s) => s.parse().ok(),
  }
}

/// Raw `page`/`pageSize` query parameters, kept as strings so the caller
/// chooses between [`PageRequest::parse`] and [`PageRequest::parse_lenient`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
  pub page:      Option<String>,
  pub page_size: Option<String>,
}

impl PageParams {
  /// Pick `page` and `pageSize` out of decoded query pairs; a repeated key
  /// keeps its first value.
  pub fn from_pairs<'a, I>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut params = Self::default();
    for (key, value) in pairs {
      let slot = match key {
        "page" => &mut params.page,
        "pageSize" => &mut params.page_size,
        _ => continue,
      };
      slot.get_or_insert_with(|| value.to_owned());
    }
    params
  }

  pub fn strict(&self) -> Result<PageRequest> {
    PageRequest::parse(self.page.as_deref(), self.page_size.as_deref())
  }

  pub fn lenient(&self) -> PageRequest {
    PageRequest::parse_lenient(self.page.as_deref(), self.page_size.as_deref())
  }
}

// ─── Response envelope ────────────────────────────────────────────────────────

/// One window of results plus the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
  pub data:        Vec<T>,
  pub page:        u32,
  pub page_size:   u32,
  pub total_count: u64,
}

impl<T> Page<T> {
  pub fn new(data: Vec<T>, request: PageRequest, total_count: u64) -> Self {
    Self {
      data,
      page: request.page(),
      page_size: request.page_size(),
      total_count,
    }
  }
}
