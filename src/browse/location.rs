//! Navigable address and the page-number bridge on top of it.
//!
//! The address is the single source of truth for the current page. The
//! controller writes a page into it through [`UrlStateBridge::write_page`]
//! and learns the current page only by reading it back after the address
//! reports a change, so writing never feeds back into itself.

use url::form_urlencoded;

/// Name of the page parameter in the query string
pub const PAGE_PARAM: &str = "page";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
  /// Keep the current scroll/selection position
  pub preserve_scroll: bool,
}

/// Navigation contract consumed by the controller.
pub trait Navigator {
  /// Current query string, without the leading `?`
  fn current_query_string(&self) -> String;

  /// Replace the query string in place (no new history entry)
  fn replace_query_string(&mut self, query: &str, options: ReplaceOptions);

  /// Counter bumped on every address change, whoever made it
  fn revision(&self) -> u64;
}

/// In-process address used by the terminal views.
#[derive(Debug, Clone)]
pub struct Location {
  path: String,
  query: String,
  revision: u64,
  reset_scroll: bool,
}

impl Location {
  pub fn new(path: impl Into<String>) -> Self {
    Self {
      path: path.into(),
      query: String::new(),
      revision: 0,
      reset_scroll: false,
    }
  }

  /// An address change that did not come from the controller, e.g. a typed
  /// `:page 3` command or a bookmark.
  pub fn set_query_string(&mut self, query: &str) {
    let query = query.trim().trim_start_matches('?');
    if query == self.query {
      return;
    }
    self.query = query.to_string();
    self.revision += 1;
    self.reset_scroll = true;
  }

  /// External jump to `page`, keeping every other parameter.
  pub fn go_to_page(&mut self, page: u32) {
    let query = with_page(&self.query, page);
    self.set_query_string(&query);
  }

  /// Full address for display
  pub fn href(&self) -> String {
    if self.query.is_empty() {
      self.path.clone()
    } else {
      format!("{}?{}", self.path, self.query)
    }
  }

  /// Whether the last change asked for the scroll position to reset.
  /// Reading clears the flag.
  pub fn take_scroll_reset(&mut self) -> bool {
    std::mem::take(&mut self.reset_scroll)
  }
}

impl Navigator for Location {
  fn current_query_string(&self) -> String {
    self.query.clone()
  }

  fn replace_query_string(&mut self, query: &str, options: ReplaceOptions) {
    let query = query.trim_start_matches('?');
    if query == self.query {
      return;
    }
    self.query = query.to_string();
    self.revision += 1;
    self.reset_scroll = !options.preserve_scroll;
  }

  fn revision(&self) -> u64 {
    self.revision
  }
}

/// Reads and writes the page number held in a [`Navigator`]'s address.
#[derive(Debug)]
pub struct UrlStateBridge<N> {
  navigator: N,
  seen_revision: Option<u64>,
}

impl<N: Navigator> UrlStateBridge<N> {
  pub fn new(navigator: N) -> Self {
    Self {
      navigator,
      seen_revision: None,
    }
  }

  /// Page in the current address; 1 when absent or unparsable.
  pub fn read_page(&self) -> u32 {
    parse_page(&self.navigator.current_query_string())
  }

  /// Rewrite the address so that [`read_page`](Self::read_page) returns
  /// `page`. Other parameters are kept; page 1 is written as no parameter.
  pub fn write_page(&mut self, page: u32) {
    let current = self.navigator.current_query_string();
    let next = with_page(&current, page);
    if next != current {
      self.navigator.replace_query_string(
        &next,
        ReplaceOptions {
          preserve_scroll: false,
        },
      );
    }
  }

  /// The page read from the address, once per observed address change.
  /// The first call always reports the initial page.
  pub fn take_change(&mut self) -> Option<u32> {
    let revision = self.navigator.revision();
    if self.seen_revision == Some(revision) {
      return None;
    }
    self.seen_revision = Some(revision);
    Some(self.read_page())
  }

  pub fn navigator(&self) -> &N {
    &self.navigator
  }

  pub fn navigator_mut(&mut self) -> &mut N {
    &mut self.navigator
  }
}

fn parse_page(query: &str) -> u32 {
  form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
    .find(|(name, _)| name == PAGE_PARAM)
    .and_then(|(_, value)| value.trim().parse::<u32>().ok())
    .filter(|page| *page >= 1)
    .unwrap_or(1)
}

fn with_page(query: &str, page: u32) -> String {
  let mut out = form_urlencoded::Serializer::new(String::new());
  for (name, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
    if name != PAGE_PARAM {
      out.append_pair(&name, &value);
    }
  }
  if page > 1 {
    out.append_pair(PAGE_PARAM, &page.to_string());
  }
  out.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bridge(query: &str) -> UrlStateBridge<Location> {
    let mut location = Location::new("/products");
    location.set_query_string(query);
    UrlStateBridge::new(location)
  }

  #[test]
  fn test_parse_page() {
    assert_eq!(parse_page(""), 1);
    assert_eq!(parse_page("page=3"), 3);
    assert_eq!(parse_page("?tab=x&page=7"), 7);
    assert_eq!(parse_page("page=abc"), 1);
    assert_eq!(parse_page("page=0"), 1);
    assert_eq!(parse_page("page=-2"), 1);
  }

  #[test]
  fn test_page_one_is_absent() {
    let mut bridge = bridge("page=4");
    bridge.write_page(1);
    assert_eq!(bridge.navigator().current_query_string(), "");
    assert_eq!(bridge.read_page(), 1);
  }

  #[test]
  fn test_write_page_keeps_other_params() {
    let mut bridge = bridge("view=compact&page=2");
    bridge.write_page(5);
    assert_eq!(
      bridge.navigator().current_query_string(),
      "view=compact&page=5"
    );
    assert_eq!(bridge.read_page(), 5);
  }

  #[test]
  fn test_take_change_reports_once_per_revision() {
    let mut bridge = bridge("page=2");
    assert_eq!(bridge.take_change(), Some(2));
    assert_eq!(bridge.take_change(), None);

    bridge.write_page(3);
    assert_eq!(bridge.take_change(), Some(3));
    assert_eq!(bridge.take_change(), None);
  }

  #[test]
  fn test_rewriting_same_page_is_not_a_change() {
    let mut bridge = bridge("page=2");
    bridge.take_change();
    bridge.write_page(2);
    assert_eq!(bridge.take_change(), None);
  }

  #[test]
  fn test_external_change_is_observed() {
    let mut bridge = bridge("");
    assert_eq!(bridge.take_change(), Some(1));

    bridge.navigator_mut().set_query_string("?page=9");
    assert_eq!(bridge.take_change(), Some(9));
  }

  #[test]
  fn test_go_to_page() {
    let mut bridge = bridge("view=compact");
    bridge.take_change();

    bridge.navigator_mut().go_to_page(4);
    assert_eq!(bridge.navigator().href(), "/products?view=compact&page=4");
    assert_eq!(bridge.take_change(), Some(4));

    bridge.navigator_mut().go_to_page(1);
    assert_eq!(bridge.navigator().href(), "/products?view=compact");
    assert_eq!(bridge.take_change(), Some(1));
  }

  #[test]
  fn test_location_href_and_scroll_reset() {
    let mut location = Location::new("/sales");
    assert_eq!(location.href(), "/sales");

    location.replace_query_string(
      "page=2",
      ReplaceOptions {
        preserve_scroll: true,
      },
    );
    assert_eq!(location.href(), "/sales?page=2");
    assert!(!location.take_scroll_reset());

    location.replace_query_string("page=3", ReplaceOptions::default());
    assert!(location.take_scroll_reset());
    assert!(!location.take_scroll_reset());
  }
}
