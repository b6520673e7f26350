use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::utils::{page_label, truncate};
use crate::browse::Pagination;

/// What the list is doing behind the current rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
  Idle,
  /// Rows came from the page cache
  Cached,
  /// A request is in flight or search input is settling
  Loading,
}

/// Draw the footer: page label, stats line and the last error if any
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  pagination: &Pagination,
  stats: &str,
  error: Option<&str>,
  activity: Activity,
) {
  let mut spans = vec![Span::raw(" ")];
  spans.extend(page_spans(pagination));

  match activity {
    Activity::Loading => spans.push(Span::styled(" ⟳", Style::default().fg(Color::Yellow))),
    Activity::Cached => spans.push(Span::styled(" cached", Style::default().fg(Color::DarkGray))),
    Activity::Idle => {}
  }

  if !stats.is_empty() {
    spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(stats.to_string(), Style::default().fg(Color::White)));
  }

  if let Some(error) = error {
    spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(
      format!(" ✗ {} ", truncate(error, 80)),
      Style::default().fg(Color::White).bg(Color::Red),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Page label flanked by ‹ › where a previous/next page exists
fn page_spans(pagination: &Pagination) -> Vec<Span<'static>> {
  let arrow = |shown: bool, glyph: &'static str| {
    if shown {
      Span::styled(glyph, Style::default().fg(Color::Cyan))
    } else {
      Span::raw("  ")
    }
  };

  vec![
    arrow(pagination.has_previous(), "‹ "),
    Span::styled(page_label(pagination), Style::default().fg(Color::Cyan).bold()),
    arrow(pagination.has_next(), " ›"),
  ]
}
