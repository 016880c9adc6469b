//! Ingestion: the contract every price source goes through to reach the log

use crate::error::{AppError, AppResult};
use crate::models::PricePoint;
use crate::repositories::{PriceHistoryRepository, ProductRepository, RetailerRepository};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A source of price observations for one retailer.
///
/// Implementations fetch and parse a listing and return a fully populated
/// [`PricePoint`], or `None` when the listing has no price right now.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Retailer this source reports for
    fn retailer_id(&self) -> &str;

    /// Fetch the current price of `product_id` from `url`
    async fn fetch_price(&self, product_id: &str, url: &str) -> AppResult<Option<PricePoint>>;
}

/// Builds observations for manually entered prices
pub struct ManualPriceEntry;

impl ManualPriceEntry {
    /// Create a price point stamped with the current time
    pub fn create_price_point(
        product_id: &str,
        retailer_id: &str,
        price: Decimal,
        url: &str,
        pack_size: u32,
        advertised_savings: Option<Decimal>,
    ) -> PricePoint {
        PricePoint {
            product_id: product_id.to_string(),
            retailer_id: retailer_id.to_string(),
            price,
            timestamp: Utc::now(),
            url: url.to_string(),
            pack_size,
            advertised_savings,
        }
    }
}

/// Validates observations and appends them to the observation log
pub struct IngestionService {
    price_repo: Arc<PriceHistoryRepository>,
    product_repo: Arc<ProductRepository>,
    retailer_repo: Arc<RetailerRepository>,
    enforce_referential_integrity: bool,
}

impl IngestionService {
    pub fn new(
        price_repo: Arc<PriceHistoryRepository>,
        product_repo: Arc<ProductRepository>,
        retailer_repo: Arc<RetailerRepository>,
        enforce_referential_integrity: bool,
    ) -> Self {
        Self {
            price_repo,
            product_repo,
            retailer_repo,
            enforce_referential_integrity,
        }
    }

    /// Whether unknown product/retailer ids are rejected
    pub fn enforces_referential_integrity(&self) -> bool {
        self.enforce_referential_integrity
    }

    /// Validate and record one observation, returning its row id
    pub async fn append(&self, point: &PricePoint) -> AppResult<i64> {
        point.validate().map_err(AppError::Validation)?;

        if self.enforce_referential_integrity {
            self.check_catalog_membership(point).await?;
        }

        let id = self.price_repo.append(point).await?;
        info!(
            "Price recorded: {} for {} (row {})",
            point, point.product_id, id
        );
        Ok(id)
    }

    async fn check_catalog_membership(&self, point: &PricePoint) -> AppResult<()> {
        if self.product_repo.find_by_id(&point.product_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Unknown product: {}",
                point.product_id
            )));
        }

        if self.retailer_repo.find_by_id(&point.retailer_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "Unknown retailer: {}",
                point.retailer_id
            )));
        }

        Ok(())
    }

    /// Fetch a price from `source` and append it.
    ///
    /// Returns the new row id, or `None` if the source had no price.
    pub async fn ingest_from(
        &self,
        source: &dyn PriceSource,
        product_id: &str,
        url: &str,
    ) -> AppResult<Option<i64>> {
        let Some(point) = source.fetch_price(product_id, url).await? else {
            warn!(
                "No price from {} for {} ({})",
                source.retailer_id(),
                product_id,
                url
            );
            return Ok(None);
        };

        if point.retailer_id != source.retailer_id() || point.product_id != product_id {
            return Err(AppError::Validation(format!(
                "Source {} returned an observation for {}/{}, expected {}/{}",
                source.retailer_id(),
                point.product_id,
                point.retailer_id,
                product_id,
                source.retailer_id()
            )));
        }

        debug!("Fetched {} from {}", point, url);
        self.append(&point).await.map(Some)
    }
}
