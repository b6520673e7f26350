//! Paginated resource browsing.
//!
//! This module provides a generic controller that backs every list view
//! (products, sales):
//! - Canonical query keys for comparing and caching queries
//! - A debounce funnel so typing in the search box does not fire a request per key
//! - An in-memory page cache, cleared whenever a non-page filter changes
//! - Last-request-wins cancellation of in-flight requests
//! - One-way synchronization of the page number from the navigable address

pub mod cache;
pub mod cancel;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod location;
pub mod query;
pub mod resource;

pub use controller::{BrowseSettings, FetchPhase, ListController};
pub use error::FetchError;
pub use location::Location;
pub use query::{FilterChange, FilterValue, Filters, Sort, SortDirection};
pub use resource::{Page, PageRequest, PageSource, Pagination, Resource};
