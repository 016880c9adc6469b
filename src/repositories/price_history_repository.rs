//! Append-only observation log

use crate::error::RepositoryError;
use crate::models::price_point::to_storage_timestamp;
use crate::models::{PriceHistoryRow, PricePoint};
use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};

/// Repository for the `price_history` observation log.
///
/// `append` is the only write; rows are never updated or deleted.
pub struct PriceHistoryRepository {
    pool: SqlitePool,
}

/// Observations inside a window plus the latest observation for the pair,
/// read from one consistent snapshot
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    pub window: Vec<PricePoint>,
    pub latest: Option<PricePoint>,
}

fn into_points(rows: Vec<PriceHistoryRow>) -> Result<Vec<PricePoint>, RepositoryError> {
    rows.into_iter()
        .map(|row| PricePoint::try_from(row).map_err(RepositoryError::InvalidData))
        .collect()
}

async fn fetch_window<'e, E>(
    executor: E,
    product_id: &str,
    retailer_id: &str,
    since: &DateTime<Utc>,
) -> Result<Vec<PricePoint>, RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, PriceHistoryRow>(
        r#"
        SELECT id, product_id, retailer_id, price, timestamp, url, pack_size, advertised_savings
        FROM price_history
        WHERE product_id = ?1
            AND retailer_id = ?2
            AND timestamp >= ?3
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(product_id)
    .bind(retailer_id)
    .bind(to_storage_timestamp(since))
    .fetch_all(executor)
    .await?;

    into_points(rows)
}

async fn fetch_recent<'e, E>(
    executor: E,
    product_id: &str,
    retailer_id: &str,
    limit: i64,
) -> Result<Vec<PricePoint>, RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    // Equal timestamps: the later insert counts as more recent
    let rows = sqlx::query_as::<_, PriceHistoryRow>(
        r#"
        SELECT id, product_id, retailer_id, price, timestamp, url, pack_size, advertised_savings
        FROM price_history
        WHERE product_id = ?1 AND retailer_id = ?2
        ORDER BY timestamp DESC, id DESC
        LIMIT ?3
        "#,
    )
    .bind(product_id)
    .bind(retailer_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    into_points(rows)
}

impl PriceHistoryRepository {
    /// Create a new PriceHistoryRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a new observation and return its row id.
    ///
    /// Callers validate first; the schema CHECKs only back up the price and
    /// pack size rules.
    pub async fn append(&self, point: &PricePoint) -> Result<i64, RepositoryError> {
        let id = sqlx::query(
            r#"
            INSERT INTO price_history
                (product_id, retailer_id, price, timestamp, url, pack_size, advertised_savings)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&point.product_id)
        .bind(&point.retailer_id)
        .bind(point.price.to_string())
        .bind(to_storage_timestamp(&point.timestamp))
        .bind(&point.url)
        .bind(i64::from(point.pack_size))
        .bind(point.advertised_savings.map(|s| s.to_string()))
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// Up to `limit` most recent observations for the pair, newest first
    pub async fn recent(
        &self,
        product_id: &str,
        retailer_id: &str,
        limit: u32,
    ) -> Result<Vec<PricePoint>, RepositoryError> {
        fetch_recent(&self.pool, product_id, retailer_id, i64::from(limit)).await
    }

    /// Most recent observation for the pair across the whole log
    pub async fn latest(
        &self,
        product_id: &str,
        retailer_id: &str,
    ) -> Result<Option<PricePoint>, RepositoryError> {
        let mut points = fetch_recent(&self.pool, product_id, retailer_id, 1).await?;
        Ok(points.pop())
    }

    /// All observations for the pair with `timestamp >= since`, oldest first
    pub async fn in_window(
        &self,
        product_id: &str,
        retailer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>, RepositoryError> {
        fetch_window(&self.pool, product_id, retailer_id, &since).await
    }

    /// Window contents and latest observation read inside one transaction,
    /// so a concurrent append cannot land between the two reads
    pub async fn window_snapshot(
        &self,
        product_id: &str,
        retailer_id: &str,
        since: DateTime<Utc>,
    ) -> Result<WindowSnapshot, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let window = fetch_window(&mut *tx, product_id, retailer_id, &since).await?;
        let latest = fetch_recent(&mut *tx, product_id, retailer_id, 1).await?.pop();

        tx.commit().await?;

        Ok(WindowSnapshot { window, latest })
    }

    /// Count observations for the pair
    pub async fn count(&self, product_id: &str, retailer_id: &str) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM price_history
            WHERE product_id = ?1 AND retailer_id = ?2
            "#,
        )
        .bind(product_id)
        .bind(retailer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
