//! Resource abstraction shared by every paginated listing.

use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Debug;

use super::error::FetchError;
use super::query::Query;

/// A paginated listing the remote API can serve (products, sales, ...).
pub trait Resource: Send + Sync + 'static {
  type Item: Clone + Debug + Send + Sync + DeserializeOwned + 'static;
  /// Aggregate statistics returned alongside every page
  type Stats: Clone + Debug + Default + PartialEq + Send + Sync + DeserializeOwned + 'static;

  /// Display name
  const NAME: &'static str;
  /// Path segment under `/stores/{id}/`
  const PATH: &'static str;
  /// Query parameter the category filter is sent as
  const CATEGORY_PARAM: &'static str;
  /// Extra boolean filter the view can toggle
  const TOGGLE_FILTER: &'static str;

  /// Category values the view cycles through; `""` means all
  fn categories() -> &'static [&'static str];

  /// Sortable fields, first one being the default
  fn sort_fields() -> &'static [&'static str];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Pagination {
  pub page: u32,
  pub limit: u32,
  pub total: u64,
  pub pages: u32,
}

impl Pagination {
  pub fn has_previous(&self) -> bool {
    self.page > 1
  }

  pub fn has_next(&self) -> bool {
    self.page < self.pages
  }
}

/// One page of results as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageResult<I, S> {
  pub items: Vec<I>,
  pub pagination: Pagination,
  #[serde(default)]
  pub stats: S,
}

impl<I, S: Default> PageResult<I, S> {
  /// Zero-result page
  pub fn empty() -> Self {
    Self {
      items: Vec::new(),
      pagination: Pagination::default(),
      stats: S::default(),
    }
  }
}

/// Page result for a resource
pub type Page<R> = PageResult<<R as Resource>::Item, <R as Resource>::Stats>;

/// Everything the transport needs to fetch one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
  pub query: Query,
  pub limit: u32,
}

/// Remote list API for one resource.
pub trait PageSource<R: Resource>: Send + Sync + 'static {
  fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<R>, FetchError>>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pagination_affordances() {
    let first = Pagination {
      page: 1,
      limit: 10,
      total: 23,
      pages: 3,
    };
    assert!(!first.has_previous());
    assert!(first.has_next());

    let last = Pagination { page: 3, ..first };
    assert!(last.has_previous());
    assert!(!last.has_next());

    let empty = Pagination::default();
    assert!(!empty.has_previous());
    assert!(!empty.has_next());
  }

  #[test]
  fn test_page_result_deserializes_without_stats() {
    let json = r#"{"items":[1,2],"pagination":{"page":1,"limit":2,"total":2,"pages":1}}"#;
    let page: PageResult<u32, u64> = serde_json::from_str(json).unwrap();
    assert_eq!(page.items, vec![1, 2]);
    assert_eq!(page.stats, 0);
    assert_eq!(page.pagination.total, 2);
  }
}
