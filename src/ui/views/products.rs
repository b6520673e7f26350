use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row};

use super::list::TableResource;
use crate::api::{Product, ProductStats, Products, StockLevel};
use crate::ui::renderfns::{money, stock_color, truncate};

impl TableResource for Products {
  fn columns() -> Vec<(&'static str, Constraint)> {
    vec![
      ("Name", Constraint::Min(20)),
      ("SKU", Constraint::Length(12)),
      ("Category", Constraint::Length(12)),
      ("Price", Constraint::Length(10)),
      ("Qty", Constraint::Length(6)),
      ("Stock", Constraint::Length(9)),
    ]
  }

  fn row(item: &Product) -> Row<'static> {
    let level = item.stock_level();
    let label = match level {
      StockLevel::InStock => "in stock",
      StockLevel::Low => "low",
      StockLevel::Out => "out",
    };

    Row::new(vec![
      Cell::from(truncate(&item.name, 40)),
      Cell::from(item.sku.clone().unwrap_or_default()).style(Style::default().fg(Color::Cyan)),
      Cell::from(item.category.clone().unwrap_or_default()),
      Cell::from(Text::from(money(item.price)).alignment(Alignment::Right)),
      Cell::from(Text::from(item.quantity.to_string()).alignment(Alignment::Right)),
      Cell::from(label).style(Style::default().fg(stock_color(level))),
    ])
  }

  fn stats_line(stats: &ProductStats) -> String {
    format!(
      "{} products · value {} · {} low · {} out",
      stats.total_products,
      money(stats.total_value),
      stats.low_stock,
      stats.out_of_stock
    )
  }

  fn empty_message() -> &'static str {
    "No products found."
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_stats_line() {
    let stats = ProductStats {
      total_products: 23,
      total_value: 1520.4,
      low_stock: 2,
      out_of_stock: 1,
    };
    assert_eq!(
      Products::stats_line(&stats),
      "23 products · value 1,520.40 · 2 low · 1 out"
    );
  }
}
