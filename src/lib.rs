#![doc = include_str!("../README.md")]
mod amount;
mod loader;
mod report;
mod status;

pub use amount::Amount;
pub use loader::{load_price_catalog, load_sales_list, PriceCatalog, SaleRecord};
pub use report::{Elapsed, Report, RESULTS_FILE};
pub use status::Status;
