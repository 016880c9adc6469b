//! Windowed price statistics for one product at one retailer

use super::PricePoint;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default deal threshold: current price must be at least 5% below average
pub const DEFAULT_DEAL_THRESHOLD: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// Statistical summary of price history for a product at a retailer.
///
/// Derived on every query and never persisted. `current_price` is the most
/// recent price in the full log for the pair, while the aggregates only
/// cover the requested window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceStats {
    pub product_id: String,
    pub retailer_id: String,
    pub current_price: Decimal,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub avg_price: Decimal,
    pub observation_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl PriceStats {
    /// Aggregate a window of observations.
    ///
    /// `latest` is the most recent observation for the pair in the whole log;
    /// when absent the window average stands in for the current price.
    /// Returns `None` for an empty window. The order of `window` does not
    /// matter.
    pub fn from_observations(
        product_id: &str,
        retailer_id: &str,
        window: &[PricePoint],
        latest: Option<&PricePoint>,
    ) -> Option<Self> {
        let first = window.first()?;

        let mut min_price = first.price;
        let mut max_price = first.price;
        let mut first_seen = first.timestamp;
        let mut last_updated = first.timestamp;

        for point in window {
            min_price = min_price.min(point.price);
            max_price = max_price.max(point.price);
            first_seen = first_seen.min(point.timestamp);
            last_updated = last_updated.max(point.timestamp);
        }

        let observation_count = window.len() as u64;
        let avg_price = average(window);
        let current_price = latest.map(|p| p.price).unwrap_or(avg_price);

        Some(Self {
            product_id: product_id.to_string(),
            retailer_id: retailer_id.to_string(),
            current_price,
            min_price,
            max_price,
            avg_price,
            observation_count,
            first_seen,
            last_updated,
        })
    }

    /// Determine if the current price is a good deal.
    ///
    /// True iff `current_price < avg_price * threshold`.
    pub fn is_good_deal(&self, threshold: Decimal) -> bool {
        match self.avg_price.checked_mul(threshold) {
            Some(limit) => self.current_price < limit,
            // Beyond Decimal range; the sign follows the threshold
            None => threshold > Decimal::ZERO,
        }
    }

    /// Savings of the current price against the window average.
    ///
    /// Negative when the current price is above average.
    pub fn savings_vs_average(&self) -> Decimal {
        self.avg_price - self.current_price
    }
}

/// Mean price of a non-empty window.
///
/// Sums exactly when the total fits in a `Decimal`, otherwise falls back to
/// a running mean whose intermediate values stay between the inputs.
fn average(window: &[PricePoint]) -> Decimal {
    let total = window
        .iter()
        .try_fold(Decimal::ZERO, |acc, point| acc.checked_add(point.price));

    match total {
        Some(total) => total / Decimal::from(window.len() as u64),
        None => window
            .iter()
            .zip(1u64..)
            .fold(Decimal::ZERO, |mean, (point, n)| {
                mean + (point.price - mean) / Decimal::from(n)
            }),
    }
}

/// Pick the stats with the lowest average price.
///
/// Ties go to the first element in iteration order.
pub fn best_by_average<'a, I>(stats: I) -> Option<&'a PriceStats>
where
    I: IntoIterator<Item = &'a PriceStats>,
{
    stats
        .into_iter()
        .min_by(|a, b| a.avg_price.cmp(&b.avg_price))
}
