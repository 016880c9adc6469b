//! Read-only reports built from the query interface: the JSON export and
//! the brand-grouped summary behind the dashboard

use crate::error::AppResult;
use crate::models::{best_by_average, PriceStats, Product, Retailer};
use crate::services::{CatalogService, StatisticsService};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One historical observation in an export, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub pack_size: u32,
    pub advertised_savings: Option<Decimal>,
}

/// Statistics for one product at one retailer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetailerPrice {
    pub retailer_id: String,
    pub current_price: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub avg_price: Decimal,
    pub is_good_deal: bool,
    pub savings_vs_avg: Decimal,
    pub observation_count: u64,
    pub last_updated: DateTime<Utc>,
    /// Unit price of the most recent observation
    pub unit_price: Option<Decimal>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPrices {
    pub id: String,
    pub name: String,
    pub size: String,
    pub category: String,
    pub brand: String,
    pub prices: Vec<RetailerPrice>,
}

/// Full export snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceExport {
    pub generated_at: DateTime<Utc>,
    pub products: Vec<ProductPrices>,
    pub retailers: Vec<Retailer>,
}

/// A product's best retailer and its per-retailer stats, cheapest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub best_retailer: String,
    pub best_avg_price: Decimal,
    pub retailers: Vec<PriceStats>,
}

/// Products of one brand and the retailer that wins most of them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrandSummary {
    pub name: String,
    pub best_retailer: Option<String>,
    pub products: Vec<ProductSummary>,
}

/// Builds reports over the catalog and statistics
pub struct ReportService {
    catalog: Arc<CatalogService>,
    statistics: Arc<StatisticsService>,
}

impl ReportService {
    pub fn new(catalog: Arc<CatalogService>, statistics: Arc<StatisticsService>) -> Self {
        Self {
            catalog,
            statistics,
        }
    }

    /// Build the export snapshot.
    ///
    /// Products without stats at any retailer are left out.
    pub async fn build_export(
        &self,
        window_days: u32,
        history_limit: u32,
        deal_threshold: Decimal,
    ) -> AppResult<PriceExport> {
        let products = self.catalog.list_products().await?;
        let retailers = self.catalog.list_retailers().await?;

        let mut exported = Vec::new();
        for product in &products {
            let mut prices = Vec::new();

            for retailer in &retailers {
                let Some(stats) = self
                    .statistics
                    .stats(&product.id, &retailer.id, window_days)
                    .await?
                else {
                    continue;
                };

                let recent = self
                    .statistics
                    .recent(&product.id, &retailer.id, history_limit)
                    .await?;
                let unit_price = recent.first().map(|p| p.price_per_unit());

                // Chronological order
                let history = recent
                    .into_iter()
                    .rev()
                    .map(|p| HistoryEntry {
                        price: p.price,
                        timestamp: p.timestamp,
                        pack_size: p.pack_size,
                        advertised_savings: p.advertised_savings,
                    })
                    .collect();

                prices.push(RetailerPrice {
                    retailer_id: retailer.id.clone(),
                    current_price: stats.current_price,
                    min_price: stats.min_price,
                    max_price: stats.max_price,
                    avg_price: stats.avg_price,
                    is_good_deal: stats.is_good_deal(deal_threshold),
                    savings_vs_avg: stats.savings_vs_average(),
                    observation_count: stats.observation_count,
                    last_updated: stats.last_updated,
                    unit_price,
                    history,
                });
            }

            if !prices.is_empty() {
                exported.push(ProductPrices {
                    id: product.id.clone(),
                    name: product.name.clone(),
                    size: product.size.clone(),
                    category: product.category.clone(),
                    brand: product.brand_name().to_string(),
                    prices,
                });
            }
        }

        Ok(PriceExport {
            generated_at: Utc::now(),
            products: exported,
            retailers,
        })
    }

    /// Group products by brand.
    ///
    /// Each product's best retailer is the lowest window average (ties to the
    /// retailer listed first). A brand's best retailer is the one that is
    /// best for the most of its products, ties again to the retailer listed
    /// first. Products without stats are skipped; brands are sorted by name.
    pub async fn brand_summaries(&self, window_days: u32) -> AppResult<Vec<BrandSummary>> {
        let products = self.catalog.list_products().await?;
        let retailers = self.catalog.list_retailers().await?;

        let mut brands: HashMap<String, BrandSummary> = HashMap::new();

        for product in &products {
            let Some(summary) = self.product_summary(product, &retailers, window_days).await?
            else {
                continue;
            };

            let brand = product.brand_name().to_string();
            let entry = brands.entry(brand.clone()).or_default();
            entry.name = brand;
            entry.products.push(summary);
        }

        let mut summaries: Vec<BrandSummary> = brands
            .into_values()
            .map(|mut brand| {
                brand.best_retailer = most_wins(&brand.products, &retailers);
                brand
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(summaries)
    }

    async fn product_summary(
        &self,
        product: &Product,
        retailers: &[Retailer],
        window_days: u32,
    ) -> AppResult<Option<ProductSummary>> {
        let available: Vec<PriceStats> = self
            .statistics
            .stats_by_retailer(&product.id, retailers, window_days)
            .await?
            .into_iter()
            .filter_map(|(_, stats)| stats)
            .collect();

        let Some(best) = best_by_average(&available) else {
            return Ok(None);
        };
        let best_retailer = best.retailer_id.clone();
        let best_avg_price = best.avg_price;

        // Stable sort keeps retailer order among equal averages
        let mut ranked = available;
        ranked.sort_by(|a, b| a.avg_price.cmp(&b.avg_price));

        Ok(Some(ProductSummary {
            id: product.id.clone(),
            name: product.name.clone(),
            best_retailer,
            best_avg_price,
            retailers: ranked,
        }))
    }
}

/// Retailer that is best for the most products, ties to the first in `retailers`
fn most_wins(products: &[ProductSummary], retailers: &[Retailer]) -> Option<String> {
    let mut wins: HashMap<&str, usize> = HashMap::new();
    for product in products {
        *wins.entry(product.best_retailer.as_str()).or_default() += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for retailer in retailers {
        let count = wins.get(retailer.id.as_str()).copied().unwrap_or(0);
        if count > 0 && best.map_or(true, |(_, top)| count > top) {
            best = Some((retailer.id.as_str(), count));
        }
    }

    best.map(|(id, _)| id.to_string())
}

/// Write an export as pretty-printed JSON, creating parent directories
pub fn write_export(path: &Path, export: &PriceExport) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(export)?;
    std::fs::write(path, json)?;

    info!(
        "Exported price data to {:?} ({} products, {} retailers)",
        path,
        export.products.len(),
        export.retailers.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn summary(id: &str, best: &str) -> ProductSummary {
        ProductSummary {
            id: id.to_string(),
            name: id.to_string(),
            best_retailer: best.to_string(),
            best_avg_price: dec!(10),
            retailers: Vec::new(),
        }
    }

    fn retailers() -> Vec<Retailer> {
        vec![
            Retailer::new("walmart", "Walmart", "https://www.walmart.com"),
            Retailer::new("target", "Target", "https://www.target.com"),
            Retailer::new("amazon", "Amazon", "https://www.amazon.com"),
        ]
    }

    #[test]
    fn test_most_wins_counts_products() {
        let products = vec![
            summary("a", "target"),
            summary("b", "walmart"),
            summary("c", "target"),
        ];
        assert_eq!(most_wins(&products, &retailers()).as_deref(), Some("target"));
    }

    #[test]
    fn test_most_wins_tie_goes_to_first_listed() {
        let products = vec![summary("a", "amazon"), summary("b", "target")];
        assert_eq!(most_wins(&products, &retailers()).as_deref(), Some("target"));
        assert_eq!(most_wins(&[], &retailers()), None);
    }

    #[test]
    fn test_write_export_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("prices_export.json");
        let export = PriceExport {
            generated_at: Utc::now(),
            products: Vec::new(),
            retailers: retailers(),
        };

        write_export(&path, &export).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: PriceExport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.retailers.len(), 3);
    }
}
