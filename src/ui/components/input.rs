use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Text changed
  Edited,
  /// Key was handled without changing the text (cursor movement)
  Moved,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Single-line text input. The cursor counts chars, not bytes, so search
/// terms like "crème" edit correctly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  pub fn value(&self) -> &str {
    &self.buffer
  }

  /// Replace the contents and put the cursor at the end
  pub fn set_value(&mut self, value: &str) {
    self.buffer = value.to_string();
    self.cursor = self.char_len();
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  fn char_len(&self) -> usize {
    self.buffer.chars().count()
  }

  /// Byte offset of the char at `idx`
  fn byte_at(&self, idx: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(idx)
      .map(|(i, _)| i)
      .unwrap_or(self.buffer.len())
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor == 0 {
          return InputResult::Moved;
        }
        self.cursor -= 1;
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        InputResult::Edited
      }
      KeyCode::Delete => {
        if self.cursor >= self.char_len() {
          return InputResult::Moved;
        }
        let at = self.byte_at(self.cursor);
        self.buffer.remove(at);
        InputResult::Edited
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Moved
      }
      KeyCode::Right => {
        self.cursor = (self.cursor + 1).min(self.char_len());
        InputResult::Moved
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::End => {
        self.cursor = self.char_len();
        InputResult::Moved
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Moved
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.char_len();
        InputResult::Moved
      }
      KeyCode::Char('u') if ctrl => {
        // Clear line before cursor
        let at = self.byte_at(self.cursor);
        self.buffer.replace_range(..at, "");
        self.cursor = 0;
        InputResult::Edited
      }
      KeyCode::Char('w') if ctrl => {
        // Delete word before cursor
        let end = self.byte_at(self.cursor);
        let before = &self.buffer[..end];
        let start = before.trim_end().rfind(' ').map(|i| i + 1).unwrap_or(0);
        self.buffer.replace_range(start..end, "");
        self.cursor = self.buffer[..start].chars().count();
        InputResult::Edited
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_at(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Edited
      }
      _ => InputResult::NotHandled,
    }
  }

  /// Cursor position in chars, for rendering
  pub fn cursor_position(&self) -> usize {
    self.cursor
  }
}
