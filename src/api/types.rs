//! Retail resources served by the back-office API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::browse::Resource;

/// Product catalog listing
pub struct Products;

/// Sales history listing
pub struct Sales;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub name: String,
  #[serde(default)]
  pub sku: Option<String>,
  #[serde(default)]
  pub category: Option<String>,
  pub price: f64,
  #[serde(default)]
  pub quantity: i64,
  #[serde(default)]
  pub low_stock_threshold: Option<i64>,
}

impl Product {
  pub fn stock_level(&self) -> StockLevel {
    if self.quantity <= 0 {
      StockLevel::Out
    } else if self.low_stock_threshold.is_some_and(|t| self.quantity <= t) {
      StockLevel::Low
    } else {
      StockLevel::InStock
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
  InStock,
  Low,
  Out,
}

/// Aggregates over the whole filtered catalog, not just the current page
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductStats {
  pub total_products: u64,
  pub total_value: f64,
  pub low_stock: u64,
  pub out_of_stock: u64,
}

impl Resource for Products {
  type Item = Product;
  type Stats = ProductStats;

  const NAME: &'static str = "Products";
  const PATH: &'static str = "products";
  const CATEGORY_PARAM: &'static str = "category";
  const TOGGLE_FILTER: &'static str = "lowStock";

  fn categories() -> &'static [&'static str] {
    &["", "produce", "dairy", "bakery", "beverages", "household"]
  }

  fn sort_fields() -> &'static [&'static str] {
    &["name", "price", "quantity"]
  }
}

/// One completed checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
  pub id: String,
  pub receipt_number: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub cashier: Option<String>,
  pub payment_method: String,
  pub status: String,
  #[serde(default)]
  pub item_count: u32,
  pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleStats {
  pub total_sales: u64,
  pub revenue: f64,
  pub average_sale: f64,
  pub refunds: u64,
}

impl Resource for Sales {
  type Item = Sale;
  type Stats = SaleStats;

  const NAME: &'static str = "Sales";
  const PATH: &'static str = "sales";
  const CATEGORY_PARAM: &'static str = "status";
  const TOGGLE_FILTER: &'static str = "today";

  fn categories() -> &'static [&'static str] {
    &["", "completed", "refunded", "voided"]
  }

  fn sort_fields() -> &'static [&'static str] {
    &["createdAt", "total"]
  }
}
