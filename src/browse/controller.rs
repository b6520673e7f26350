//! Paginated list controller.
//!
//! Reconciles the address (current page), the page cache and in-flight
//! requests for one list view. Every input is an explicit event:
//!
//! - [`ListController::on_page_change`] writes the address, nothing else.
//! - [`ListController::on_filter_change`] / [`ListController::on_search_input`]
//!   change the filters, clear the cache and send the address back to page 1.
//! - [`ListController::invalidate`] drops the cache after a mutation.
//! - [`ListController::poll`] is called on every tick: it reads address
//!   changes, settled search input and finished requests, then decides
//!   whether the effective query needs serving.
//!
//! # Example
//!
//! ```ignore
//! let mut products = ListController::<Products, _>::new(
//!     Arc::new(client.clone()),
//!     Location::new("/products"),
//!     BrowseSettings::default(),
//!     Some("store-1".into()),
//! );
//!
//! // In event loop tick
//! if products.poll() {
//!     // View state changed, trigger re-render
//! }
//!
//! // In render
//! let view = products.view();
//! if view.is_initial_load { render_spinner() } else { render_table(&view.items) }
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::cache::ResourceCache;
use super::cancel::CancellationRegistry;
use super::debounce::Debouncer;
use super::error::FetchError;
use super::location::{Navigator, UrlStateBridge};
use super::query::{FilterChange, Filters, QueryKey};
use super::resource::{Page, PageRequest, PageSource, Pagination, Resource};

/// Tunables for one controller instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseSettings {
  pub page_size: u32,
  pub search_debounce: Duration,
  /// Maximum cached pages; 0 means unbounded
  pub cache_capacity: usize,
}

impl Default for BrowseSettings {
  fn default() -> Self {
    Self {
      page_size: 10,
      search_debounce: super::debounce::DEFAULT_DELAY,
      cache_capacity: 64,
    }
  }
}

/// Where the controller is in serving the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
  /// Nothing has been requested yet
  Idle,
  /// The current query was answered from the cache
  ServingFromCache,
  /// A request for the current query is in flight
  Fetching,
  /// The current query's request resolved (successfully or not)
  Settled,
  /// The in-flight request was cancelled without a replacement
  Aborted,
}

/// Snapshot the rendering layer reads.
#[derive(Debug, Clone)]
pub struct ViewState<R: Resource> {
  /// Page read from the address
  pub current_page: u32,
  pub filters: Filters,
  pub items: Vec<R::Item>,
  /// Pagination of the last settled result; drives page labels
  pub pagination: Pagination,
  pub stats: R::Stats,
  /// True until the first result (or failure) arrives; never set again
  pub is_initial_load: bool,
  pub last_error: Option<String>,
}

impl<R: Resource> ViewState<R> {
  fn new(filters: Filters) -> Self {
    Self {
      current_page: 1,
      filters,
      items: Vec::new(),
      pagination: Pagination::default(),
      stats: R::Stats::default(),
      is_initial_load: true,
      last_error: None,
    }
  }

  /// `false` is the "no store selected" state, not an empty result
  pub fn scope_selected(&self) -> bool {
    self.filters.scope_id.is_some()
  }
}

/// A finished request reported back by its task
struct Completion<R: Resource> {
  id: u64,
  key: QueryKey,
  result: Result<Page<R>, FetchError>,
}

pub struct ListController<R: Resource, N: Navigator> {
  source: Arc<dyn PageSource<R>>,
  page_size: u32,
  cache: ResourceCache<Page<R>>,
  requests: CancellationRegistry,
  bridge: UrlStateBridge<N>,
  search: Debouncer<String>,
  view: ViewState<R>,
  phase: FetchPhase,
  /// Key of the query the view shows or is fetching
  active_key: Option<QueryKey>,
  completions_tx: mpsc::UnboundedSender<Completion<R>>,
  completions_rx: mpsc::UnboundedReceiver<Completion<R>>,
}

impl<R: Resource, N: Navigator> ListController<R, N> {
  /// Create a controller. Nothing is fetched until the first
  /// [`poll`](Self::poll), which reads the initial page from the address.
  pub fn new(
    source: Arc<dyn PageSource<R>>,
    navigator: N,
    settings: BrowseSettings,
    scope_id: Option<String>,
  ) -> Self {
    let (completions_tx, completions_rx) = mpsc::unbounded_channel();
    let filters = Filters::for_scope(scope_id);

    Self {
      source,
      page_size: settings.page_size.max(1),
      cache: ResourceCache::with_capacity(settings.cache_capacity),
      requests: CancellationRegistry::new(),
      bridge: UrlStateBridge::new(navigator),
      search: Debouncer::new(settings.search_debounce),
      view: ViewState::new(filters),
      phase: FetchPhase::Idle,
      active_key: None,
      completions_tx,
      completions_rx,
    }
  }

  pub fn view(&self) -> &ViewState<R> {
    &self.view
  }

  pub fn phase(&self) -> FetchPhase {
    self.phase
  }

  pub fn is_fetching(&self) -> bool {
    self.requests.live_key().is_some()
  }

  /// Search text is still settling
  pub fn is_search_pending(&self) -> bool {
    self.search.is_pending()
  }

  #[cfg(test)]
  pub fn cache(&self) -> &ResourceCache<Page<R>> {
    &self.cache
  }

  pub fn navigator(&self) -> &N {
    self.bridge.navigator()
  }

  pub fn navigator_mut(&mut self) -> &mut N {
    self.bridge.navigator_mut()
  }

  /// Request a page. Only the address is written; `current_page` follows
  /// once the address change is read back.
  pub fn on_page_change(&mut self, page: u32) {
    self.bridge.write_page(page.max(1));
  }

  /// Go one page forward, judged by the settled pagination
  pub fn next_page(&mut self) {
    if self.position().has_next() {
      self.on_page_change(self.view.current_page + 1);
    }
  }

  pub fn previous_page(&mut self) {
    if self.position().has_previous() {
      self.on_page_change(self.view.current_page - 1);
    }
  }

  /// Settled pagination seen from the page the address points at
  fn position(&self) -> Pagination {
    Pagination {
      page: self.view.current_page,
      ..self.view.pagination
    }
  }

  /// Change a non-page dimension and serve the resulting query.
  pub fn on_filter_change(&mut self, change: FilterChange) {
    if self.apply_filter(change) {
      self.refresh();
    }
  }

  /// Feed a raw keystroke value of the search box
  pub fn on_search_input(&mut self, text: impl Into<String>) {
    self.search.push(text.into());
  }

  /// Settle pending search input right away
  pub fn submit_search(&mut self) {
    if let Some(search) = self.search.flush() {
      self.on_filter_change(FilterChange::Search(search));
    }
  }

  /// Data changed remotely: drop every cached page and refetch the current one.
  pub fn invalidate(&mut self) {
    if !self.cache.is_empty() {
      debug!(entries = self.cache.len(), "invalidating page cache");
      self.cache.clear();
    }
    self.read_address();
    self.evaluate(true);
  }

  /// Process everything that happened since the last call. Returns `true`
  /// if the view state may have changed.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;

    if let Some(search) = self.search.poll() {
      changed |= self.apply_filter(FilterChange::Search(search));
    }

    changed |= self.read_address();

    while let Ok(completion) = self.completions_rx.try_recv() {
      changed |= self.apply_completion(completion);
    }

    changed |= self.evaluate(false);
    changed
  }

  /// Wait for the next request to finish and apply it.
  ///
  /// Pending forever while nothing is in flight, so only await it alongside
  /// other event sources or when a request is known to be outstanding.
  pub async fn next_completion(&mut self) -> bool {
    match self.completions_rx.recv().await {
      Some(completion) => {
        let changed = self.apply_completion(completion);
        self.evaluate(false) || changed
      }
      None => false,
    }
  }

  fn refresh(&mut self) {
    self.read_address();
    self.evaluate(false);
  }

  /// The only place `current_page` is assigned.
  fn read_address(&mut self) -> bool {
    match self.bridge.take_change() {
      Some(page) if page != self.view.current_page => {
        self.view.current_page = page;
        true
      }
      _ => false,
    }
  }

  fn apply_filter(&mut self, change: FilterChange) -> bool {
    let next = self.view.filters.with(change);
    if next == self.view.filters {
      return false;
    }

    debug!(
      cached = self.cache.len(),
      "filters changed; clearing page cache"
    );
    self.view.filters = next;
    self.cache.clear();
    self.bridge.write_page(1);
    true
  }

  /// Serve the effective query if its identity changed (or `force`).
  fn evaluate(&mut self, force: bool) -> bool {
    let Some(query) = self.view.filters.query_for(self.view.current_page) else {
      return self.present_no_scope();
    };

    let key = query.key();
    if !force && self.active_key.as_ref() == Some(&key) {
      return false;
    }
    self.active_key = Some(key.clone());

    if let Some(page) = self.cache.get(&key).cloned() {
      if let Some(superseded) = self.requests.cancel_live() {
        debug!(key = %superseded.digest(), "cache hit supersedes in-flight request");
      }
      debug!(key = %key.digest(), page = query.page, "serving page from cache");
      self.apply_page(page);
      self.phase = FetchPhase::ServingFromCache;
      return true;
    }

    let handle = self.requests.register(key.clone());
    info!(
      key = %key.digest(),
      resource = R::NAME,
      scope = %query.scope_id,
      page = query.page,
      "fetching page"
    );

    let future = self.source.fetch_page(PageRequest {
      query,
      limit: self.page_size,
    });
    let token = handle.token();
    let tx = self.completions_tx.clone();
    let id = handle.id();

    tokio::spawn(async move {
      let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(FetchError::Cancelled),
        result = future => result,
      };
      // Receiver is gone once the view is torn down
      let _ = tx.send(Completion { id, key, result });
    });

    self.phase = FetchPhase::Fetching;
    false
  }

  fn present_no_scope(&mut self) -> bool {
    if let Some(key) = self.requests.cancel_live() {
      debug!(key = %key.digest(), "scope cleared; request aborted");
      self.phase = FetchPhase::Aborted;
    }
    if self.active_key.take().is_none() && self.view.items.is_empty() {
      return false;
    }
    let is_initial_load = self.view.is_initial_load;
    self.apply_page(Page::<R>::empty());
    self.view.is_initial_load = is_initial_load;
    true
  }

  fn apply_completion(&mut self, completion: Completion<R>) -> bool {
    let Completion { id, key, result } = completion;

    if !self.requests.resolve(id) {
      debug!(id, key = %key.digest(), "discarding superseded response");
      return false;
    }

    match result {
      Ok(page) => {
        debug!(
          key = %key.digest(),
          items = page.items.len(),
          total = page.pagination.total,
          "page loaded"
        );
        self.cache.set(key, page.clone());
        self.apply_page(page);
        self.phase = FetchPhase::Settled;
        true
      }
      Err(err) if err.is_cancellation() => {
        debug!(key = %key.digest(), "request aborted");
        self.phase = FetchPhase::Aborted;
        false
      }
      Err(err) => {
        warn!(key = %key.digest(), error = %err, "failed to load page");
        self.apply_page(Page::<R>::empty());
        self.view.last_error = Some(err.to_string());
        self.phase = FetchPhase::Settled;
        true
      }
    }
  }

  fn apply_page(&mut self, page: Page<R>) {
    self.view.items = page.items;
    self.view.pagination = page.pagination;
    self.view.stats = page.stats;
    self.view.is_initial_load = false;
    self.view.last_error = None;
  }
}
