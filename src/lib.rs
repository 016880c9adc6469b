//! Price Tracker Library
//!
//! Price-history storage and statistics for a small set of products tracked
//! across retailers. Exposes the catalog, the append-only observation log,
//! the statistics engine, and the reports built on top of them.

pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export commonly used types
pub use config::{AppConfig, TrackerConfig};
pub use error::{AppError, AppResult};
pub use models::*;

use database::Database;
use repositories::*;
use services::*;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state containing all repositories and services
pub struct AppState {
    pub database: Database,
    pub product_repo: Arc<ProductRepository>,
    pub retailer_repo: Arc<RetailerRepository>,
    pub price_repo: Arc<PriceHistoryRepository>,
    pub catalog: Arc<CatalogService>,
    pub ingestion: Arc<IngestionService>,
    pub statistics: Arc<StatisticsService>,
    pub reports: Arc<ReportService>,
}

impl AppState {
    /// Create a new AppState with initialized repositories and services
    pub fn new(pool: SqlitePool, tracker: &TrackerConfig) -> Self {
        let database = Database::new(pool.clone());

        let product_repo = Arc::new(ProductRepository::new(pool.clone()));
        let retailer_repo = Arc::new(RetailerRepository::new(pool.clone()));
        let price_repo = Arc::new(PriceHistoryRepository::new(pool));

        let catalog = Arc::new(CatalogService::new(
            product_repo.clone(),
            retailer_repo.clone(),
        ));
        let ingestion = Arc::new(IngestionService::new(
            price_repo.clone(),
            product_repo.clone(),
            retailer_repo.clone(),
            tracker.enforce_referential_integrity,
        ));
        let statistics = Arc::new(StatisticsService::new(price_repo.clone()));
        let reports = Arc::new(ReportService::new(catalog.clone(), statistics.clone()));

        Self {
            database,
            product_repo,
            retailer_repo,
            price_repo,
            catalog,
            ingestion,
            statistics,
            reports,
        }
    }
}
