pub mod client;
pub mod types;

pub use client::RetailClient;
pub use types::{Product, ProductStats, Products, Sale, SaleStats, Sales, StockLevel};
