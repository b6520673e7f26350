mod list;
mod products;
mod sales;

pub use list::ResourceListView;
