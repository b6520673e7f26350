use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use futures::future::LocalBoxFuture;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};

use crate::browse::{
  BrowseSettings, FetchPhase, FilterChange, FilterValue, Filters, ListController, Location,
  PageSource, Resource, Sort, SortDirection,
};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{draw_footer, Activity};
use crate::ui::view::{ShortcutInfo, View, ViewAction};

/// How a resource is laid out as a table.
pub trait TableResource: Resource {
  /// Column titles and widths
  fn columns() -> Vec<(&'static str, Constraint)>;

  fn row(item: &Self::Item) -> Row<'static>;

  /// One-line summary of the stats block
  fn stats_line(stats: &Self::Stats) -> String;

  /// Shown when a store is selected but nothing matches
  fn empty_message() -> &'static str;
}

/// Paginated table over any [`TableResource`], backed by a [`ListController`].
pub struct ResourceListView<R: TableResource> {
  controller: ListController<R, Location>,
  table_state: TableState,
  search: SearchInput,
}

impl<R: TableResource> ResourceListView<R> {
  pub fn new(source: Arc<dyn PageSource<R>>, settings: BrowseSettings, store: Option<String>) -> Self {
    let location = Location::new(format!("/{}", R::PATH));

    Self {
      controller: ListController::new(source, location, settings, store),
      table_state: TableState::default(),
      search: SearchInput::new(),
    }
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let view = self.controller.view();
    let block = Block::default()
      .title(title::<R>(&view.filters))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let message = if !view.scope_selected() {
      Some("No store selected. Use :store <id> or press S.")
    } else if view.is_initial_load {
      Some("Loading…")
    } else if view.items.is_empty() && view.last_error.is_some() {
      Some("Failed to load. Press 'r' to retry.")
    } else if view.items.is_empty() {
      Some(R::empty_message())
    } else {
      None
    };

    if let Some(message) = message {
      let paragraph = Paragraph::new(message)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let columns = R::columns();
    let header = Row::new(columns.iter().map(|(name, _)| *name))
      .style(Style::default().fg(Color::Yellow).bold());
    let rows: Vec<Row> = view.items.iter().map(R::row).collect();
    let len = rows.len();

    let table = Table::new(rows, columns.iter().map(|(_, width)| *width))
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    ensure_valid_selection(&mut self.table_state, len);
    frame.render_stateful_widget(table, area, &mut self.table_state);
  }

  fn activity(&self) -> Activity {
    if self.controller.is_fetching() || self.controller.is_search_pending() {
      Activity::Loading
    } else if self.controller.phase() == FetchPhase::ServingFromCache {
      Activity::Cached
    } else {
      Activity::Idle
    }
  }

  // Key handling helpers for or_else chain pattern
  fn handle_overlays(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match self.search.handle_key(key) {
      KeyResult::Handled => Some(ViewAction::None),
      KeyResult::Event(SearchEvent::Changed(term)) => {
        self.controller.on_search_input(term);
        Some(ViewAction::None)
      }
      KeyResult::Event(SearchEvent::Submitted(term))
      | KeyResult::Event(SearchEvent::Cancelled(term)) => {
        self.controller.on_search_input(term);
        self.controller.submit_search();
        Some(ViewAction::None)
      }
      KeyResult::NotHandled => None,
    }
  }

  fn handle_navigation(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('n') | KeyCode::Right => self.controller.next_page(),
      KeyCode::Char('p') | KeyCode::Left => self.controller.previous_page(),
      _ => return None,
    }
    Some(ViewAction::None)
  }

  fn handle_filters(&mut self, key: KeyEvent) -> Option<ViewAction> {
    let filters = &self.controller.view().filters;
    let change = match key.code {
      KeyCode::Char('/') => {
        let current = filters.search.clone();
        self.search.activate(&current);
        return Some(ViewAction::None);
      }
      KeyCode::Char('c') => FilterChange::Category(next_category(&filters.category, R::categories())),
      KeyCode::Char('f') => FilterChange::Extra {
        name: R::TOGGLE_FILTER.to_string(),
        value: (!filters.flag(R::TOGGLE_FILTER)).then_some(FilterValue::Flag(true)),
      },
      KeyCode::Char('o') => FilterChange::Sort(next_sort(filters.sort.as_ref(), R::sort_fields())),
      _ => return None,
    };

    self.controller.on_filter_change(change);
    Some(ViewAction::None)
  }

  fn handle_actions(&mut self, key: KeyEvent) -> Option<ViewAction> {
    match key.code {
      KeyCode::Char('r') => {
        self.controller.invalidate();
        Some(ViewAction::None)
      }
      KeyCode::Char('S') => Some(ViewAction::CycleStore),
      KeyCode::Char('q') => Some(ViewAction::Quit),
      _ => None,
    }
  }
}

impl<R: TableResource> View for ResourceListView<R> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    self
      .handle_overlays(key)
      .or_else(|| self.handle_navigation(key))
      .or_else(|| self.handle_filters(key))
      .or_else(|| self.handle_actions(key))
      .unwrap_or(ViewAction::None)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(1), Constraint::Length(1)])
      .split(area);

    self.render_table(frame, chunks[0]);

    let view = self.controller.view();
    draw_footer(
      frame,
      chunks[1],
      &view.pagination,
      &R::stats_line(&view.stats),
      view.last_error.as_deref(),
      self.activity(),
    );

    // Let search component render its overlay
    self.search.render_overlay(frame, chunks[0]);
  }

  fn breadcrumb_label(&self) -> String {
    R::NAME.to_string()
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn address(&self) -> String {
    self.controller.navigator().href()
  }

  fn store(&self) -> Option<&str> {
    self.controller.view().filters.scope_id.as_deref()
  }

  fn set_store(&mut self, store: Option<String>) {
    self.controller.on_filter_change(FilterChange::Scope(store));
  }

  fn go_to_page(&mut self, page: u32) {
    self.controller.navigator_mut().go_to_page(page);
  }

  fn set_filter(&mut self, name: String, value: Option<String>) {
    self.controller.on_filter_change(FilterChange::Extra {
      name,
      value: value.map(FilterValue::Text),
    });
  }

  fn refresh(&mut self) {
    self.controller.invalidate();
  }

  fn tick(&mut self) {
    self.controller.poll();
    if self.controller.navigator_mut().take_scroll_reset() {
      self.table_state.select(Some(0));
    }
  }

  fn next_completion(&mut self) -> LocalBoxFuture<'_, bool> {
    Box::pin(self.controller.next_completion())
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("n/p", "page").with_priority(30),
      ShortcutInfo::new("c", "category").with_priority(40),
      ShortcutInfo::new("f", R::TOGGLE_FILTER).with_priority(50),
      ShortcutInfo::new("o", "sort").with_priority(60),
      ShortcutInfo::new("S", "store").with_priority(70),
      ShortcutInfo::new("q", "quit").with_priority(80),
    ]
  }
}

/// Table title summarizing the active filters
fn title<R: Resource>(filters: &Filters) -> String {
  let mut parts = Vec::new();
  if !filters.search.is_empty() {
    parts.push(format!("/{}", filters.search));
  }
  if !filters.category.is_empty() {
    parts.push(filters.category.clone());
  }
  if filters.flag(R::TOGGLE_FILTER) {
    parts.push(R::TOGGLE_FILTER.to_string());
  }
  if let Some(sort) = &filters.sort {
    let arrow = match sort.direction {
      SortDirection::Asc => "↑",
      SortDirection::Desc => "↓",
    };
    parts.push(format!("{}{}", sort.field, arrow));
  }

  if parts.is_empty() {
    format!(" {} ", R::NAME)
  } else {
    format!(" {} [{}] ", R::NAME, parts.join(" · "))
  }
}

/// The category after `current`, wrapping around to "all"
fn next_category(current: &str, categories: &[&str]) -> String {
  let idx = categories.iter().position(|c| *c == current);
  let next = match idx {
    Some(i) => categories.get(i + 1),
    None => categories.first(),
  };
  next.or(categories.first()).copied().unwrap_or_default().to_string()
}

/// Cycle: unsorted → each field ascending then descending → unsorted
fn next_sort(current: Option<&Sort>, fields: &[&str]) -> Option<Sort> {
  let Some(current) = current else {
    return fields.first().map(|f| Sort::new(*f, SortDirection::Asc));
  };

  if current.direction == SortDirection::Asc {
    return Some(Sort::new(current.field.clone(), SortDirection::Desc));
  }

  fields
    .iter()
    .position(|f| *f == current.field)
    .and_then(|i| fields.get(i + 1))
    .map(|f| Sort::new(*f, SortDirection::Asc))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{Product, Products};
  use crate::browse::resource::PageResult;
  use crate::browse::{FetchError, Page, PageRequest, Pagination};
  use crossterm::event::KeyModifiers;
  use futures::future::BoxFuture;
  use std::sync::Mutex;

  /// Serves three pages of one product each and records requests
  #[derive(Default)]
  struct StubSource {
    requests: Mutex<Vec<PageRequest>>,
  }

  impl PageSource<Products> for StubSource {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, Result<Page<Products>, FetchError>> {
      let page = request.query.page;
      self.requests.lock().unwrap().push(request);
      Box::pin(async move {
        Ok(PageResult {
          items: vec![Product {
            id: format!("p{}", page),
            name: format!("Item {}", page),
            sku: None,
            category: None,
            price: 1.0,
            quantity: 4,
            low_stock_threshold: None,
          }],
          pagination: Pagination {
            page,
            limit: 1,
            total: 3,
            pages: 3,
          },
          stats: Default::default(),
        })
      })
    }
  }

  fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
  }

  async fn settle(view: &mut ResourceListView<Products>) {
    view.tick();
    while view.controller.is_fetching() {
      view.next_completion().await;
    }
    view.tick();
  }

  fn view_with(source: Arc<StubSource>, store: Option<&str>) -> ResourceListView<Products> {
    ResourceListView::new(source, BrowseSettings::default(), store.map(String::from))
  }

  #[test]
  fn test_next_category_wraps() {
    let categories = ["", "dairy", "bakery"];
    assert_eq!(next_category("", &categories), "dairy");
    assert_eq!(next_category("dairy", &categories), "bakery");
    assert_eq!(next_category("bakery", &categories), "");
    assert_eq!(next_category("unknown", &categories), "");
    assert_eq!(next_category("", &[]), "");
  }

  #[test]
  fn test_next_sort_cycle() {
    let fields = ["name", "price"];
    let first = next_sort(None, &fields);
    assert_eq!(first, Some(Sort::new("name", SortDirection::Asc)));

    let second = next_sort(first.as_ref(), &fields);
    assert_eq!(second, Some(Sort::new("name", SortDirection::Desc)));

    let third = next_sort(second.as_ref(), &fields);
    assert_eq!(third, Some(Sort::new("price", SortDirection::Asc)));

    let fourth = next_sort(third.as_ref(), &fields);
    let fifth = next_sort(fourth.as_ref(), &fields);
    assert_eq!(fifth, None);
  }

  #[test]
  fn test_title_lists_active_filters() {
    let filters = Filters::for_scope(Some("store-1".into()))
      .with(FilterChange::Search("milk".into()))
      .with(FilterChange::Extra {
        name: "lowStock".into(),
        value: Some(FilterValue::Flag(true)),
      })
      .with(FilterChange::Sort(Some(Sort::new("price", SortDirection::Desc))));

    assert_eq!(title::<Products>(&filters), " Products [/milk · lowStock · price↓] ");
    assert_eq!(title::<Products>(&Filters::default()), " Products ");
  }

  #[tokio::test]
  async fn test_paging_keys_move_through_the_address() {
    let source = Arc::new(StubSource::default());
    let mut view = view_with(source.clone(), Some("store-1"));
    settle(&mut view).await;
    assert_eq!(view.address(), "/products");

    view.handle_key(key('n'));
    settle(&mut view).await;
    assert_eq!(view.address(), "/products?page=2");
    assert_eq!(view.controller.view().current_page, 2);

    view.handle_key(key('p'));
    settle(&mut view).await;
    assert_eq!(view.address(), "/products");
    // Page 1 came from cache
    assert_eq!(source.requests.lock().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn test_filter_keys_reset_to_first_page() {
    let source = Arc::new(StubSource::default());
    let mut view = view_with(source.clone(), Some("store-1"));
    settle(&mut view).await;
    view.go_to_page(3);
    settle(&mut view).await;
    assert_eq!(view.controller.view().current_page, 3);

    view.handle_key(key('f'));
    settle(&mut view).await;
    assert_eq!(view.controller.view().current_page, 1);
    assert!(view.controller.view().filters.flag("lowStock"));

    let last = source.requests.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.query.page, 1);
    assert!(last.query.extra.contains_key("lowStock"));

    view.handle_key(key('f'));
    assert!(!view.controller.view().filters.flag("lowStock"));
  }

  #[tokio::test]
  async fn test_search_overlay_swallows_list_keys() {
    let source = Arc::new(StubSource::default());
    let mut view = view_with(source, Some("store-1"));
    settle(&mut view).await;

    view.handle_key(key('/'));
    for c in "qn".chars() {
      assert_eq!(view.handle_key(key(c)), ViewAction::None);
    }
    view.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    settle(&mut view).await;

    assert_eq!(view.controller.view().filters.search, "qn");
    assert_eq!(view.controller.view().current_page, 1);
    assert_eq!(view.handle_key(key('q')), ViewAction::Quit);
  }

  #[tokio::test]
  async fn test_store_changes() {
    let source = Arc::new(StubSource::default());
    let mut view = view_with(source.clone(), None);
    settle(&mut view).await;
    assert!(!view.controller.view().scope_selected());
    assert!(source.requests.lock().unwrap().is_empty());
    assert_eq!(view.handle_key(key('S')), ViewAction::CycleStore);

    view.set_store(Some("store-2".into()));
    settle(&mut view).await;
    assert_eq!(view.store(), Some("store-2"));
    assert_eq!(view.controller.view().items.len(), 1);
  }

  #[tokio::test]
  async fn test_next_completion_applies_finished_request() {
    let source = Arc::new(StubSource::default());
    let mut view = view_with(source, Some("store-1"));
    view.tick();
    assert_eq!(view.activity(), Activity::Loading);

    assert!(view.next_completion().await);
    assert_eq!(view.controller.view().items.len(), 1);
    assert!(!view.controller.view().is_initial_load);
    assert_eq!(view.activity(), Activity::Idle);

    view.handle_key(key('n'));
    settle(&mut view).await;
    view.handle_key(key('p'));
    view.tick();
    assert_eq!(view.activity(), Activity::Cached);
  }

  #[tokio::test]
  async fn test_text_filter_resets_page_and_reaches_query() {
    let source = Arc::new(StubSource::default());
    let mut view = view_with(source.clone(), Some("store-1"));
    settle(&mut view).await;
    view.go_to_page(2);
    settle(&mut view).await;

    view.set_filter("supplier".into(), Some("acme".into()));
    settle(&mut view).await;
    assert_eq!(view.controller.view().current_page, 1);
    let last = source.requests.lock().unwrap().last().cloned().unwrap();
    assert_eq!(
      last.query.extra.get("supplier"),
      Some(&FilterValue::Text("acme".into()))
    );

    view.set_filter("supplier".into(), None);
    assert!(view.controller.view().filters.extra.is_empty());
  }
}
