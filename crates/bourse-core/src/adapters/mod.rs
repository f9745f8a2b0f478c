//! Data source implementations.

pub mod directory;
pub mod investing;
pub mod offline;

pub use directory::{DirectoryError, StockDirectory};
pub use investing::InvestingAdapter;
pub use offline::OfflineAdapter;
