use ratatui::prelude::Color;

use crate::api::StockLevel;
use crate::browse::Pagination;

/// Truncate a string to a maximum number of chars, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Format an amount with two decimals and thousands separators
pub fn money(amount: f64) -> String {
  let sign = if amount < 0.0 { "-" } else { "" };
  let cents = (amount.abs() * 100.0).round() as u64;
  let whole = (cents / 100).to_string();

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, c) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }

  format!("{}{}.{:02}", sign, grouped, cents % 100)
}

/// Display color for a sale status
pub fn sale_status_color(status: &str) -> Color {
  match status {
    "completed" => Color::Green,
    "refunded" => Color::Yellow,
    "voided" => Color::Red,
    _ => Color::White,
  }
}

pub fn stock_color(level: StockLevel) -> Color {
  match level {
    StockLevel::InStock => Color::Green,
    StockLevel::Low => Color::Yellow,
    StockLevel::Out => Color::Red,
  }
}

/// "Page X of Y (N total)"; a result with no pages still reads as page 1 of 1
pub fn page_label(pagination: &Pagination) -> String {
  format!(
    "Page {} of {} ({} total)",
    pagination.page.max(1),
    pagination.pages.max(1),
    pagination.total
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("milk", 10), "milk");
    assert_eq!(truncate("bread", 5), "bread");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("sourdough loaf", 8), "sourd...");
    assert_eq!(truncate("crème fraîche", 8), "crème...");
  }

  #[test]
  fn test_money() {
    assert_eq!(money(0.0), "0.00");
    assert_eq!(money(1.5), "1.50");
    assert_eq!(money(1234.567), "1,234.57");
    assert_eq!(money(1_000_000.0), "1,000,000.00");
    assert_eq!(money(-12.3), "-12.30");
  }

  #[test]
  fn test_sale_status_color() {
    assert_eq!(sale_status_color("completed"), Color::Green);
    assert_eq!(sale_status_color("refunded"), Color::Yellow);
    assert_eq!(sale_status_color("voided"), Color::Red);
    assert_eq!(sale_status_color("pending"), Color::White);
  }

  #[test]
  fn test_page_label() {
    let pagination = Pagination {
      page: 2,
      limit: 10,
      total: 23,
      pages: 3,
    };
    assert_eq!(page_label(&pagination), "Page 2 of 3 (23 total)");
    assert_eq!(page_label(&Pagination::default()), "Page 1 of 1 (0 total)");
  }
}
