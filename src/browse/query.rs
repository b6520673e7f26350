//! Query model and canonical key encoding.
//!
//! A [`Query`] is everything that identifies one page of a listing: the
//! store it belongs to, the page number, the free-text search, the category
//! and any extra filters, plus the sort. [`encode`] turns it into a
//! [`QueryKey`] that compares equal exactly when the queries are fieldwise
//! equal, no matter in which order the filters were set.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use url::form_urlencoded;

/// Value of an extra (non-category) filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
  Flag(bool),
  Text(String),
}

impl FilterValue {
  /// A value that means "filter not applied"
  fn is_unset(&self) -> bool {
    match self {
      FilterValue::Flag(flag) => !flag,
      FilterValue::Text(text) => text.trim().is_empty(),
    }
  }

  /// Value as sent to the remote API
  pub fn as_param(&self) -> String {
    match self {
      FilterValue::Flag(flag) => flag.to_string(),
      FilterValue::Text(text) => text.clone(),
    }
  }

  /// Typed form used inside query keys, so `Flag(true)` and `Text("true")`
  /// never collide.
  fn as_key_part(&self) -> String {
    match self {
      FilterValue::Flag(flag) => format!("b:{}", flag),
      FilterValue::Text(text) => format!("s:{}", text),
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  pub fn as_str(&self) -> &'static str {
    match self {
      SortDirection::Asc => "asc",
      SortDirection::Desc => "desc",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Sort {
  pub field: String,
  pub direction: SortDirection,
}

impl Sort {
  pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
    Self {
      field: field.into(),
      direction,
    }
  }
}

/// One user-initiated change to the non-page part of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
  /// Switch the active store; `None` means no store is selected
  Scope(Option<String>),
  /// Settled free-text search
  Search(String),
  /// Category (products) or status (sales); empty string means all
  Category(String),
  /// Set or clear an extra filter
  Extra {
    name: String,
    value: Option<FilterValue>,
  },
  Sort(Option<Sort>),
}

/// The non-page part of a query.
///
/// Unlike [`Query`], the scope may be absent: that is the "no store selected
/// yet" state, which is distinct from a well-formed query with zero results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
  pub scope_id: Option<String>,
  pub search: String,
  pub category: String,
  pub extra: BTreeMap<String, FilterValue>,
  pub sort: Option<Sort>,
}

impl Filters {
  /// Empty filters for a store; a blank id counts as no store
  pub fn for_scope(scope_id: Option<String>) -> Self {
    Self::default().with(FilterChange::Scope(scope_id))
  }

  /// Apply a change in place. Extra filters that are switched off or empty
  /// are removed rather than stored, so equal filter sets stay equal.
  pub fn apply(&mut self, change: FilterChange) {
    match change {
      FilterChange::Scope(scope_id) => {
        self.scope_id = scope_id.filter(|s| !s.trim().is_empty());
      }
      FilterChange::Search(search) => self.search = search.trim().to_string(),
      FilterChange::Category(category) => self.category = category.trim().to_string(),
      FilterChange::Extra { name, value } => match value {
        Some(value) if !value.is_unset() => {
          self.extra.insert(name, value);
        }
        _ => {
          self.extra.remove(&name);
        }
      },
      FilterChange::Sort(sort) => self.sort = sort,
    }
  }

  /// Returns a copy with the change applied
  pub fn with(&self, change: FilterChange) -> Self {
    let mut next = self.clone();
    next.apply(change);
    next
  }

  pub fn flag(&self, name: &str) -> bool {
    matches!(self.extra.get(name), Some(FilterValue::Flag(true)))
  }

  /// Build the full query for a page, or `None` while no scope is selected.
  pub fn query_for(&self, page: u32) -> Option<Query> {
    let scope_id = self.scope_id.clone()?;
    Some(Query {
      scope_id,
      page: page.max(1),
      search: self.search.clone(),
      category: self.category.clone(),
      extra: self.extra.clone(),
      sort: self.sort.clone(),
    })
  }
}

/// A fully-formed listing query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Query {
  pub scope_id: String,
  pub page: u32,
  pub search: String,
  pub category: String,
  pub extra: BTreeMap<String, FilterValue>,
  pub sort: Option<Sort>,
}

impl Query {
  pub fn key(&self) -> QueryKey {
    encode(self)
  }
}

/// Canonical, totally ordered identity of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
  #[cfg(test)]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Short sha256 fingerprint for log fields
  pub fn digest(&self) -> String {
    let mut hasher = Sha256::new();
    hasher.update(self.0.as_bytes());
    hex::encode(&hasher.finalize()[..6])
  }
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Encode a query into its canonical key.
///
/// Fields are written in alphabetical order of their names (`category`,
/// `extra.*`, `order`, `page`, `scope`, `search`, `sort`) and every value is
/// form-urlencoded, so distinct queries can never produce the same string.
pub fn encode(query: &Query) -> QueryKey {
  let mut out = form_urlencoded::Serializer::new(String::new());
  out.append_pair("category", &query.category);
  // BTreeMap iterates in name order
  for (name, value) in &query.extra {
    out.append_pair(&format!("extra.{}", name), &value.as_key_part());
  }
  if let Some(sort) = &query.sort {
    out.append_pair("order", sort.direction.as_str());
  }
  out.append_pair("page", &query.page.to_string());
  out.append_pair("scope", &query.scope_id);
  out.append_pair("search", &query.search);
  if let Some(sort) = &query.sort {
    out.append_pair("sort", &sort.field);
  }
  QueryKey(out.finish())
}
