//! Listing parameters and the cache shape-key derived from them.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Server-side cap on page size, applied regardless of the requested limit.
pub const MAX_PAGE_SIZE: u32 = 10;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Glob matching every listing key; used for wholesale invalidation.
pub const LISTING_KEY_PATTERN: &str = "p:*";

// ─── Sorting ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
  /// Creation time.
  #[default]
  Date,
  Age,
  Gender,
  Nationality,
}

impl SortField {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Date => "date",
      Self::Age => "age",
      Self::Gender => "gender",
      Self::Nationality => "nationality",
    }
  }
}

impl FromStr for SortField {
  type Err = UnknownSortValue;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "date" => Ok(Self::Date),
      "age" => Ok(Self::Age),
      "gender" => Ok(Self::Gender),
      "nationality" => Ok(Self::Nationality),
      other => Err(UnknownSortValue(other.to_owned())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Asc,
  Desc,
}

impl SortOrder {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Asc => "asc",
      Self::Desc => "desc",
    }
  }
}

impl FromStr for SortOrder {
  type Err = UnknownSortValue;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "asc" => Ok(Self::Asc),
      "desc" => Ok(Self::Desc),
      other => Err(UnknownSortValue(other.to_owned())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort value: {0:?}")]
pub struct UnknownSortValue(pub String);

// ─── Query ───────────────────────────────────────────────────────────────────

/// Normalised listing parameters. Construct with [`ListQuery::new`] or
/// [`ListQuery::from_params`]; both clamp page and limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
  page:       u32,
  limit:      u32,
  sort_field: SortField,
  sort_order: SortOrder,
}

impl Default for ListQuery {
  fn default() -> Self {
    Self::new(DEFAULT_PAGE as i64, DEFAULT_LIMIT as i64, SortField::default(), SortOrder::default())
  }
}

impl ListQuery {
  /// Non-positive page or limit fall back to the defaults; limit is capped at
  /// [`MAX_PAGE_SIZE`].
  pub fn new(page: i64, limit: i64, sort_field: SortField, sort_order: SortOrder) -> Self {
    let page = u32::try_from(page).ok().filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
    let limit = u32::try_from(limit)
      .ok()
      .filter(|l| *l > 0)
      .unwrap_or(DEFAULT_LIMIT)
      .min(MAX_PAGE_SIZE);
    Self { page, limit, sort_field, sort_order }
  }

  /// Build from loosely-typed request parameters. Unknown sort values fall
  /// back to the defaults rather than failing the request.
  pub fn from_params(
    page:       Option<i64>,
    limit:      Option<i64>,
    sort_field: Option<&str>,
    sort_order: Option<&str>,
  ) -> Self {
    Self::new(
      page.unwrap_or(DEFAULT_PAGE as i64),
      limit.unwrap_or(DEFAULT_LIMIT as i64),
      sort_field.and_then(|s| s.parse().ok()).unwrap_or_default(),
      sort_order.and_then(|s| s.parse().ok()).unwrap_or_default(),
    )
  }

  pub fn page(&self) -> u32 { self.page }

  pub fn limit(&self) -> u32 { self.limit }

  pub fn sort_field(&self) -> SortField { self.sort_field }

  pub fn sort_order(&self) -> SortOrder { self.sort_order }

  pub fn offset(&self) -> u64 { u64::from(self.page - 1) * u64::from(self.limit) }

  pub fn cache_key(&self) -> ListingKey { ListingKey::from(self) }
}

// ─── Shape-key ───────────────────────────────────────────────────────────────

/// Cache key for one listing shape, e.g. `p:1:10:date:a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListingKey(String);

impl ListingKey {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&ListQuery> for ListingKey {
  fn from(q: &ListQuery) -> Self {
    // Only the first character of the order is kept: `a` or `d`.
    let order = &q.sort_order.as_str()[..1];
    Self(format!("p:{}:{}:{}:{}", q.page, q.limit, q.sort_field.as_str(), order))
  }
}

impl fmt::Display for ListingKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_to_missing_and_non_positive_values() {
    let q = ListQuery::from_params(None, None, None, None);
    assert_eq!((q.page(), q.limit()), (1, 10));
    assert_eq!(q.sort_field(), SortField::Date);
    assert_eq!(q.sort_order(), SortOrder::Asc);

    let q = ListQuery::from_params(Some(0), Some(-3), None, None);
    assert_eq!((q.page(), q.limit()), (1, 10));
  }

  #[test]
  fn limit_is_capped() {
    let q = ListQuery::new(2, 500, SortField::Age, SortOrder::Desc);
    assert_eq!(q.limit(), MAX_PAGE_SIZE);
    assert_eq!(q.offset(), 10);
  }

  #[test]
  fn unknown_sort_values_fall_back() {
    let q = ListQuery::from_params(None, None, Some("shoe_size"), Some("sideways"));
    assert_eq!(q.sort_field(), SortField::Date);
    assert_eq!(q.sort_order(), SortOrder::Asc);
  }

  #[test]
  fn cache_key_uses_first_char_of_order() {
    let q = ListQuery::new(3, 5, SortField::Nationality, SortOrder::Desc);
    assert_eq!(q.cache_key().as_str(), "p:3:5:nationality:d");
    assert_eq!(ListQuery::default().cache_key().as_str(), "p:1:10:date:a");
  }

  #[test]
  fn cache_keys_share_the_invalidation_prefix() {
    let key = ListQuery::default().cache_key();
    let prefix = LISTING_KEY_PATTERN.trim_end_matches('*');
    assert!(key.as_str().starts_with(prefix));
  }
}
