pub mod footer;
pub mod header;
pub mod utils;

pub use footer::{draw_footer, Activity};
pub use header::draw_header;
pub use utils::{money, sale_status_color, stock_color, truncate};
