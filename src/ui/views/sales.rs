use chrono::Local;
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Row};

use super::list::TableResource;
use crate::api::{Sale, SaleStats, Sales};
use crate::ui::renderfns::{money, sale_status_color, truncate};

impl TableResource for Sales {
  fn columns() -> Vec<(&'static str, Constraint)> {
    vec![
      ("Receipt", Constraint::Length(12)),
      ("Date", Constraint::Length(17)),
      ("Cashier", Constraint::Min(12)),
      ("Payment", Constraint::Length(10)),
      ("Items", Constraint::Length(6)),
      ("Total", Constraint::Length(11)),
      ("Status", Constraint::Length(10)),
    ]
  }

  fn row(sale: &Sale) -> Row<'static> {
    let date = sale
      .created_at
      .with_timezone(&Local)
      .format("%Y-%m-%d %H:%M")
      .to_string();

    Row::new(vec![
      Cell::from(sale.receipt_number.clone()).style(Style::default().fg(Color::Cyan)),
      Cell::from(date),
      Cell::from(truncate(sale.cashier.as_deref().unwrap_or("-"), 24)),
      Cell::from(sale.payment_method.clone()),
      Cell::from(Text::from(sale.item_count.to_string()).alignment(Alignment::Right)),
      Cell::from(Text::from(money(sale.total)).alignment(Alignment::Right)),
      Cell::from(sale.status.clone()).style(Style::default().fg(sale_status_color(&sale.status))),
    ])
  }

  fn stats_line(stats: &SaleStats) -> String {
    format!(
      "{} sales · revenue {} · avg {} · {} refunds",
      stats.total_sales,
      money(stats.revenue),
      money(stats.average_sale),
      stats.refunds
    )
  }

  fn empty_message() -> &'static str {
    "No sales found."
  }
}
