pub mod catalog_service;
pub mod ingestion;
pub mod report_service;
pub mod statistics_service;

pub use catalog_service::{starter_products, starter_retailers, CatalogService};
pub use ingestion::{IngestionService, ManualPriceEntry, PriceSource};
pub use report_service::{
    write_export, BrandSummary, HistoryEntry, PriceExport, ProductPrices, ProductSummary,
    ReportService, RetailerPrice,
};
pub use statistics_service::StatisticsService;
