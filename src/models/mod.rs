//! Domain models for the price tracker.
//!
//! Catalog entities (products, retailers), price observations, and the
//! statistics derived from them.

pub mod price_point;
pub mod price_stats;
pub mod product;
pub mod retailer;

// Re-export all models for convenient access
pub use price_point::{PriceHistoryRow, PricePoint};
pub use price_stats::{best_by_average, PriceStats, DEFAULT_DEAL_THRESHOLD};
pub use product::Product;
pub use retailer::Retailer;
