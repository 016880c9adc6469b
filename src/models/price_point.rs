//! Price observations and their storage representation

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// A single price observation at a specific time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub product_id: String,
    pub retailer_id: String,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
    pub url: String,   // Listing URL at the retailer
    pub pack_size: u32, // 1 for single items
    pub advertised_savings: Option<Decimal>, // Retailer's own "$X off" claim
}

impl PricePoint {
    /// Create a single-item observation with no advertised savings
    pub fn new(
        product_id: impl Into<String>,
        retailer_id: impl Into<String>,
        price: Decimal,
        timestamp: DateTime<Utc>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            retailer_id: retailer_id.into(),
            price,
            timestamp,
            url: url.into(),
            pack_size: 1,
            advertised_savings: None,
        }
    }

    /// Set the pack size for multi-packs
    pub fn with_pack_size(mut self, pack_size: u32) -> Self {
        self.pack_size = pack_size;
        self
    }

    /// Set the advertised savings
    pub fn with_advertised_savings(mut self, savings: Decimal) -> Self {
        self.advertised_savings = Some(savings);
        self
    }

    /// Price of one unit of a multi-pack
    ///
    /// Only meaningful for validated points (`pack_size >= 1`); a zero pack
    /// size yields the pack price unchanged.
    pub fn price_per_unit(&self) -> Decimal {
        if self.pack_size == 0 {
            return self.price;
        }
        self.price / Decimal::from(self.pack_size)
    }

    /// Check the observation invariants, returning a description of the
    /// first violation found
    pub fn validate(&self) -> Result<(), String> {
        if self.product_id.trim().is_empty() {
            return Err("product_id must not be empty".to_string());
        }
        if self.retailer_id.trim().is_empty() {
            return Err("retailer_id must not be empty".to_string());
        }
        if self.price <= Decimal::ZERO {
            return Err(format!("price must be positive, got {}", self.price));
        }
        if self.pack_size < 1 {
            return Err(format!("pack_size must be at least 1, got {}", self.pack_size));
        }
        if !is_storable(&self.timestamp) {
            return Err(format!(
                "timestamp must fall in years {}..={}, got {}",
                STORABLE_YEARS.start(),
                STORABLE_YEARS.end(),
                self.timestamp
            ));
        }
        if let Some(savings) = self.advertised_savings {
            if savings < Decimal::ZERO {
                return Err(format!(
                    "advertised_savings must not be negative, got {}",
                    savings
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pack_size > 1 {
            write!(
                f,
                "${:.2} ({}-pack) @ {}",
                self.price, self.pack_size, self.retailer_id
            )
        } else {
            write!(f, "${:.2} (single) @ {}", self.price, self.retailer_id)
        }
    }
}

/// Years whose RFC 3339 form has a plain four-digit year
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Whether `timestamp` keeps lexical and chronological order aligned once stored
pub fn is_storable(timestamp: &DateTime<Utc>) -> bool {
    STORABLE_YEARS.contains(&timestamp.year())
}

/// Start of year 0, the earliest storable instant
pub fn earliest_storable() -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(*STORABLE_YEARS.start(), 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Format a timestamp for storage.
///
/// Always nine fractional digits and a `Z` suffix, so that lexical order of
/// the stored strings is chronological order. That only holds for
/// [`is_storable`] timestamps; `validate` rejects the rest.
pub fn to_storage_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a timestamp written by [`to_storage_timestamp`]
pub fn from_storage_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", raw, e))
}

/// Raw `price_history` row as stored in SQLite
#[derive(Debug, Clone, FromRow)]
pub struct PriceHistoryRow {
    pub id: i64,
    pub product_id: String,
    pub retailer_id: String,
    pub price: String,
    pub timestamp: String,
    pub url: String,
    pub pack_size: i64,
    pub advertised_savings: Option<String>,
}

impl TryFrom<PriceHistoryRow> for PricePoint {
    type Error = String;

    fn try_from(row: PriceHistoryRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price)
            .map_err(|e| format!("Invalid price '{}' in row {}: {}", row.price, row.id, e))?;

        let advertised_savings = row
            .advertised_savings
            .as_deref()
            .map(Decimal::from_str)
            .transpose()
            .map_err(|e| format!("Invalid advertised_savings in row {}: {}", row.id, e))?;

        let pack_size = u32::try_from(row.pack_size)
            .map_err(|_| format!("Invalid pack_size {} in row {}", row.pack_size, row.id))?;

        Ok(Self {
            product_id: row.product_id,
            retailer_id: row.retailer_id,
            price,
            timestamp: from_storage_timestamp(&row.timestamp)?,
            url: row.url,
            pack_size,
            advertised_savings,
        })
    }
}
