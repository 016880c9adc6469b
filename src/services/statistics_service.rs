use crate::error::AppResult;
use crate::models::price_point::earliest_storable;
use crate::models::{best_by_average, PricePoint, PriceStats, Retailer};
use crate::repositories::PriceHistoryRepository;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

/// Computes price statistics from the observation log on demand.
///
/// Nothing is cached: every call rescans the observations it needs.
pub struct StatisticsService {
    price_repo: Arc<PriceHistoryRepository>,
}

impl StatisticsService {
    pub fn new(price_repo: Arc<PriceHistoryRepository>) -> Self {
        Self { price_repo }
    }

    /// Statistics for the last `window_days` days, or `None` without data
    pub async fn stats(
        &self,
        product_id: &str,
        retailer_id: &str,
        window_days: u32,
    ) -> AppResult<Option<PriceStats>> {
        self.stats_at(product_id, retailer_id, window_days, Utc::now())
            .await
    }

    /// Statistics over observations with `timestamp >= now - window_days`.
    ///
    /// The window has no upper bound; observations stamped after `now` count.
    /// A window reaching past year 0 covers the whole log.
    pub async fn stats_at(
        &self,
        product_id: &str,
        retailer_id: &str,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PriceStats>> {
        let since = window_start(now, window_days);
        let snapshot = self
            .price_repo
            .window_snapshot(product_id, retailer_id, since)
            .await?;

        let stats = PriceStats::from_observations(
            product_id,
            retailer_id,
            &snapshot.window,
            snapshot.latest.as_ref(),
        );

        debug!(
            "Stats for {}/{} over {} days: {} observations",
            product_id,
            retailer_id,
            window_days,
            snapshot.window.len()
        );
        Ok(stats)
    }

    /// Up to `limit` most recent observations, newest first
    pub async fn recent(
        &self,
        product_id: &str,
        retailer_id: &str,
        limit: u32,
    ) -> AppResult<Vec<PricePoint>> {
        Ok(self.price_repo.recent(product_id, retailer_id, limit).await?)
    }

    /// Statistics for a product at each retailer, in retailer order
    pub async fn stats_by_retailer<'r>(
        &self,
        product_id: &str,
        retailers: &'r [Retailer],
        window_days: u32,
    ) -> AppResult<Vec<(&'r Retailer, Option<PriceStats>)>> {
        let mut results = Vec::with_capacity(retailers.len());
        for retailer in retailers {
            let stats = self.stats(product_id, &retailer.id, window_days).await?;
            results.push((retailer, stats));
        }
        Ok(results)
    }

    /// Retailer with the lowest window average for a product.
    ///
    /// Only retailers with stats compete; ties go to the retailer listed first.
    pub async fn best_retailer(
        &self,
        product_id: &str,
        retailers: &[Retailer],
        window_days: u32,
    ) -> AppResult<Option<PriceStats>> {
        let per_retailer = self
            .stats_by_retailer(product_id, retailers, window_days)
            .await?;

        let available: Vec<PriceStats> = per_retailer
            .into_iter()
            .filter_map(|(_, stats)| stats)
            .collect();

        Ok(best_by_average(&available).cloned())
    }
}

/// `now - window_days`, clamped to the earliest storable instant
fn window_start(now: DateTime<Utc>, window_days: u32) -> DateTime<Utc> {
    let floor = earliest_storable();
    now.checked_sub_signed(Duration::days(i64::from(window_days)))
        .map_or(floor, |since| since.max(floor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_start() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 0, 0, 0).unwrap();
        assert_eq!(
            window_start(now, 30),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(window_start(now, u32::MAX), earliest_storable());
        assert_eq!(window_start(now, 100_000_000), earliest_storable());
    }
}
