use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::view::ShortcutInfo;

/// Draw the header bar with title, view, store, address and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  view: &str,
  store: Option<&str>,
  address: &str,
  shortcuts: &[ShortcutInfo],
) {
  let separator = || Span::styled("│", Style::default().fg(Color::DarkGray));

  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    separator(),
    Span::styled(format!(" {} ", view), Style::default().fg(Color::White).bold()),
    separator(),
    match store {
      Some(store) => Span::styled(format!(" {} ", store), Style::default().fg(Color::Yellow).bold()),
      None => Span::styled(" no store ", Style::default().fg(Color::DarkGray)),
    },
    separator(),
    Span::styled(format!(" {} ", address), Style::default().fg(Color::White)),
    Span::raw(" "),
  ];

  // Keys highlighted, descriptions dimmed
  for shortcut in shortcuts {
    spans.push(Span::styled(
      format!(" <{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
