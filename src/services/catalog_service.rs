use crate::error::{AppError, AppResult};
use crate::models::{Product, Retailer};
use crate::repositories::{ProductRepository, RetailerRepository};
use std::sync::Arc;
use tracing::{debug, info};

/// Service for the product and retailer catalog
pub struct CatalogService {
    product_repo: Arc<ProductRepository>,
    retailer_repo: Arc<RetailerRepository>,
}

impl CatalogService {
    pub fn new(product_repo: Arc<ProductRepository>, retailer_repo: Arc<RetailerRepository>) -> Self {
        Self {
            product_repo,
            retailer_repo,
        }
    }

    /// Insert or replace a product keyed by id
    pub async fn upsert_product(&self, product: &Product) -> AppResult<Product> {
        if product.id.trim().is_empty() {
            return Err(AppError::Validation("product id must not be empty".into()));
        }

        let stored = self.product_repo.upsert(product).await?;
        debug!("Upserted product {}", stored.id);
        Ok(stored)
    }

    /// Insert or replace a retailer keyed by id
    pub async fn upsert_retailer(&self, retailer: &Retailer) -> AppResult<Retailer> {
        if retailer.id.trim().is_empty() {
            return Err(AppError::Validation("retailer id must not be empty".into()));
        }

        let stored = self.retailer_repo.upsert(retailer).await?;
        debug!("Upserted retailer {}", stored.id);
        Ok(stored)
    }

    /// All tracked products
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        Ok(self.product_repo.list().await?)
    }

    /// All configured retailers
    pub async fn list_retailers(&self) -> AppResult<Vec<Retailer>> {
        Ok(self.retailer_repo.list().await?)
    }

    pub async fn find_product(&self, id: &str) -> AppResult<Option<Product>> {
        Ok(self.product_repo.find_by_id(id).await?)
    }

    pub async fn find_retailer(&self, id: &str) -> AppResult<Option<Retailer>> {
        Ok(self.retailer_repo.find_by_id(id).await?)
    }

    /// Install the starter retailers and products.
    ///
    /// Safe to run repeatedly. Returns `(retailers, products)` written.
    pub async fn seed_starter_catalog(&self) -> AppResult<(usize, usize)> {
        let retailers = starter_retailers();
        let products = starter_products();

        for retailer in &retailers {
            self.upsert_retailer(retailer).await?;
            info!("  ✓ {}", retailer);
        }

        for product in &products {
            self.upsert_product(product).await?;
            info!("  ✓ {}", product);
        }

        info!(
            "Starter catalog installed: {} retailers, {} products",
            retailers.len(),
            products.len()
        );
        Ok((retailers.len(), products.len()))
    }
}

/// Retailers tracked out of the box
pub fn starter_retailers() -> Vec<Retailer> {
    vec![
        Retailer::new("walmart", "Walmart", "https://www.walmart.com"),
        Retailer::new("target", "Target", "https://www.target.com"),
    ]
}

/// Products tracked out of the box
pub fn starter_products() -> Vec<Product> {
    vec![
        Product::new(
            "eucerin-eczema-5oz",
            "Eucerin Eczema Relief Cream",
            "5 oz",
            "skincare",
        ),
        Product::new(
            "pataday-max-strength",
            "Pataday Once Daily Relief Extra Strength",
            "2.5 mL",
            "eye-drops",
        ),
    ]
}
