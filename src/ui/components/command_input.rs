use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command line submitted
  Submitted(String),
  /// Command cancelled
  Cancelled,
}

/// Command input component with autocomplete
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if command mode is currently active
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Activate command mode
  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  fn close(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  /// Get autocomplete suggestions for current input
  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(self.input.value())
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    // Active - handle command-specific keys first
    match key.code {
      KeyCode::Esc => {
        self.close();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        let line = self.resolve_command();
        self.close();
        return KeyResult::Event(CommandEvent::Submitted(line));
      }
      KeyCode::Tab | KeyCode::Down => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + count - 1) % count;
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Edited => {
        self.selected_suggestion = 0; // Reset on input change
        KeyResult::Handled
      }
      InputResult::NotHandled => KeyResult::NotHandled,
      _ => KeyResult::Handled,
    }
  }

  /// Final command line: typed arguments are kept as-is, a bare word
  /// resolves to the selected suggestion.
  fn resolve_command(&self) -> String {
    let typed = self.input.value().trim();
    if typed.contains(char::is_whitespace) {
      return typed.to_string();
    }

    self
      .suggestions()
      .get(self.selected_suggestion)
      .map(|cmd| cmd.name.to_string())
      .unwrap_or_else(|| typed.to_lowercase())
  }

  /// Render the command overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let suggestion_count = suggestions.len().min(8) as u16;
    let height = (3 + suggestion_count).min(area.height);

    let overlay_area = Rect::new(area.x + 1, area.y + 1, width.saturating_sub(1), height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Command ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Input line
        Constraint::Min(0),    // Suggestions
      ])
      .split(inner);

    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if !suggestions.is_empty() && chunks[1].height > 0 {
      let items: Vec<ListItem> = suggestions
        .iter()
        .take(8)
        .map(|cmd| {
          let name = if cmd.takes_arg {
            format!("{} <arg>", cmd.name)
          } else {
            cmd.name.to_string()
          };
          ListItem::new(Line::from(vec![
            Span::styled(format!("{:<14}", name), Style::default().fg(Color::Cyan)),
            Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
          ]))
        })
        .collect();

      let list =
        List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

      let mut state = ListState::default();
      state.select(Some(self.selected_suggestion));

      frame.render_stateful_widget(list, chunks[1], &mut state);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn type_line(input: &mut CommandInput, line: &str) {
    for c in line.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn test_colon_activates() {
    let mut input = CommandInput::new();
    assert_eq!(input.handle_key(key(KeyCode::Char('x'))), KeyResult::NotHandled);
    assert_eq!(input.handle_key(key(KeyCode::Char(':'))), KeyResult::Handled);
    assert!(input.is_active());
  }

  #[test]
  fn test_bare_word_resolves_to_suggestion() {
    let mut input = CommandInput::new();
    input.activate();
    type_line(&mut input, "sal");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("sales".into()))
    );
    assert!(!input.is_active());
  }

  #[test]
  fn test_arguments_are_kept() {
    let mut input = CommandInput::new();
    input.activate();
    type_line(&mut input, "page 3");
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("page 3".into()))
    );
  }

  #[test]
  fn test_tab_cycles_suggestions() {
    let mut input = CommandInput::new();
    input.activate();
    input.handle_key(key(KeyCode::Tab));
    input.handle_key(key(KeyCode::Enter));

    input.activate();
    input.handle_key(key(KeyCode::BackTab));
    assert_eq!(
      input.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(CommandEvent::Submitted("quit".into()))
    );
  }

  #[test]
  fn test_escape_cancels() {
    let mut input = CommandInput::new();
    input.activate();
    type_line(&mut input, "store");
    assert_eq!(
      input.handle_key(key(KeyCode::Esc)),
      KeyResult::Event(CommandEvent::Cancelled)
    );
    assert!(!input.is_active());
  }
}
