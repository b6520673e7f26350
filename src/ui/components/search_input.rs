use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by search input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Text changed; emitted on each edit
  Changed(String),
  /// Enter pressed, overlay closed, term persists
  Submitted(String),
  /// Escape pressed; carries the term the overlay was opened with
  Cancelled(String),
}

/// Search overlay opened with `/`
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  input: TextInput,
  active: bool,
  /// Term in effect when the overlay was opened
  original: String,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn query(&self) -> &str {
    self.input.value()
  }

  /// Open the overlay pre-filled with the current term
  pub fn activate(&mut self, current: &str) {
    self.active = true;
    self.original = current.to_string();
    self.input.set_value(current);
  }

  /// Handle a key event while active. Activation is left to the parent
  /// since it knows the current term.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(term) => {
        self.active = false;
        KeyResult::Event(SearchEvent::Submitted(term))
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.set_value(&self.original);
        KeyResult::Event(SearchEvent::Cancelled(self.original.clone()))
      }
      InputResult::Edited => KeyResult::Event(SearchEvent::Changed(self.query().to_string())),
      InputResult::Moved => KeyResult::Handled,
      // Swallow everything else so list shortcuts don't fire mid-typing
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the search overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let height = 3u16.min(area.height); // Just input line with borders

    // Top-left of content area with small margin
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width.saturating_sub(1), height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Search ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let value = self.query();
    let split = value
      .char_indices()
      .nth(self.input.cursor_position())
      .map(|(i, _)| i)
      .unwrap_or(value.len());
    let (before, after) = value.split_at(split);

    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(before),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
      Span::raw(after),
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::{KeyCode, KeyModifiers};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_passes_keys_through() {
    let mut search = SearchInput::new();
    assert_eq!(
      search.handle_key(key(KeyCode::Char('j'))),
      KeyResult::NotHandled
    );
  }

  #[test]
  fn test_edits_emit_changes() {
    let mut search = SearchInput::new();
    search.activate("");
    assert_eq!(
      search.handle_key(key(KeyCode::Char('t'))),
      KeyResult::Event(SearchEvent::Changed("t".into()))
    );
    assert_eq!(
      search.handle_key(key(KeyCode::Char('e'))),
      KeyResult::Event(SearchEvent::Changed("te".into()))
    );
    assert_eq!(search.handle_key(key(KeyCode::Left)), KeyResult::Handled);
    assert_eq!(
      search.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(SearchEvent::Submitted("te".into()))
    );
    assert!(!search.is_active());
  }

  #[test]
  fn test_cancel_restores_original_term() {
    let mut search = SearchInput::new();
    search.activate("bread");
    search.handle_key(key(KeyCode::Backspace));
    assert_eq!(search.query(), "brea");

    assert_eq!(
      search.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(SearchEvent::Cancelled("bread".into()))
    );
    assert_eq!(search.query(), "bread");
  }
}
