use crossterm::event::KeyEvent;
use futures::future::{self, LocalBoxFuture};
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Actions that a view can request in response to user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
  /// No action needed
  None,
  /// Move to the next configured store
  CycleStore,
  /// Exit the application
  Quit,
}

/// Trait for view behavior
///
/// Views handle their own input modes (search etc.) and return actions for
/// the App to execute: App → View → Components.
///
/// List views own a `ListController` and poll it in `tick()`.
pub trait View {
  /// Handle a key event, returning an action for App to execute
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  /// Render the view to the frame
  fn render(&mut self, frame: &mut Frame, area: Rect);

  /// Get the breadcrumb label for this view
  fn breadcrumb_label(&self) -> String;

  /// Whether an overlay is taking typed text, so app-level keys stay off
  fn captures_input(&self) -> bool {
    false
  }

  /// Address of the view including its query string
  fn address(&self) -> String;

  /// Store the view is scoped to
  fn store(&self) -> Option<&str> {
    None
  }

  /// Re-scope the view to another store (or none)
  fn set_store(&mut self, _store: Option<String>) {}

  /// Jump to a page as an external address change
  fn go_to_page(&mut self, _page: u32) {}

  /// Set (or with `None`, clear) a named text filter
  fn set_filter(&mut self, _name: String, _value: Option<String>) {}

  /// Drop cached data and reload
  fn refresh(&mut self) {}

  /// Called on each tick to allow views to poll async work
  fn tick(&mut self) {}

  /// Resolves once background work finished and was applied, so the app
  /// can redraw without waiting for the next tick. Views with no background
  /// work never resolve.
  fn next_completion(&mut self) -> LocalBoxFuture<'_, bool> {
    Box::pin(future::pending())
  }

  /// Get keyboard shortcuts to display in the header
  /// Override this to provide view-specific shortcuts
  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("q", "quit").with_priority(30),
    ]
  }
}
