pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::TableState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // View, including its footer
    ])
    .split(frame.area());

  let mut shortcuts = app.view().shortcuts();
  shortcuts.sort_by_key(|s| s.priority);
  renderfns::draw_header(
    frame,
    chunks[0],
    app.title(),
    &app.view().breadcrumb_label(),
    app.view().store(),
    &app.view().address(),
    &shortcuts,
  );

  app.view_mut().render(frame, chunks[1]);
  app.command_input().render_overlay(frame, chunks[1]);
}

/// Keep the table selection inside the current rows
pub fn ensure_valid_selection(state: &mut TableState, len: usize) {
  if len == 0 {
    state.select(None);
  } else {
    match state.selected() {
      Some(i) if i >= len => state.select(Some(len - 1)),
      None => state.select(Some(0)),
      _ => {}
    }
  }
}
