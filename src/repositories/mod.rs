pub mod price_history_repository;
pub mod product_repository;
pub mod retailer_repository;

// Re-export all repositories for convenient access
pub use price_history_repository::{PriceHistoryRepository, WindowSnapshot};
pub use product_repository::ProductRepository;
pub use retailer_repository::RetailerRepository;
