#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use price_tracker::config::TrackerConfig;
use price_tracker::models::*;
use price_tracker::AppState;
use rust_decimal::Decimal;
use sqlx::SqlitePool;

pub const EUCERIN: &str = "eucerin-eczema-5oz";
pub const PATADAY: &str = "pataday-max-strength";
pub const WALMART: &str = "walmart";
pub const TARGET: &str = "target";

/// Test database with the application state wired on top of it
pub struct TestDatabase {
    pub pool: SqlitePool,
    pub state: AppState,
}

impl TestDatabase {
    /// Create TestDatabase from a `#[sqlx::test]` pool with default settings
    pub async fn from_pool(pool: SqlitePool) -> Self {
        Self::with_config(pool, &TrackerConfig::default()).await
    }

    /// Create TestDatabase that rejects observations for unknown catalog ids
    pub async fn strict(pool: SqlitePool) -> Self {
        let config = TrackerConfig {
            enforce_referential_integrity: true,
            ..TrackerConfig::default()
        };
        Self::with_config(pool, &config).await
    }

    pub async fn with_config(pool: SqlitePool, config: &TrackerConfig) -> Self {
        Self {
            state: AppState::new(pool.clone(), config),
            pool,
        }
    }

    /// Install the starter retailers and products
    pub async fn seed_catalog(&self) {
        self.state
            .catalog
            .seed_starter_catalog()
            .await
            .expect("Failed to seed catalog");
    }

    /// Append an observation, panicking on failure
    pub async fn record(&self, point: PricePoint) -> i64 {
        self.state
            .ingestion
            .append(&point)
            .await
            .expect("Failed to append price point")
    }
}

/// Instant `days` days before now
pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// Single-item observation at `timestamp`
pub fn observation(
    product_id: &str,
    retailer_id: &str,
    price: Decimal,
    timestamp: DateTime<Utc>,
) -> PricePoint {
    PricePoint::new(
        product_id,
        retailer_id,
        price,
        timestamp,
        format!("https://www.{}.com/ip/{}", retailer_id, product_id),
    )
}
