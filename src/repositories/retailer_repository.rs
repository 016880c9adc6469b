use crate::error::RepositoryError;
use crate::models::Retailer;
use sqlx::SqlitePool;

/// Repository for retailers
pub struct RetailerRepository {
    pool: SqlitePool,
}

impl RetailerRepository {
    /// Create a new RetailerRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a retailer, or replace the attributes of an existing one (last write wins)
    pub async fn upsert(&self, retailer: &Retailer) -> Result<Retailer, RepositoryError> {
        let stored = sqlx::query_as::<_, Retailer>(
            r#"
            INSERT INTO retailers (id, name, base_url)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE
            SET name = excluded.name,
                base_url = excluded.base_url
            RETURNING id, name, base_url
            "#,
        )
        .bind(&retailer.id)
        .bind(&retailer.name)
        .bind(&retailer.base_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Find a retailer by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Retailer>, RepositoryError> {
        let retailer = sqlx::query_as::<_, Retailer>(
            r#"
            SELECT id, name, base_url
            FROM retailers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(retailer)
    }

    /// List all retailers, ordered by id
    pub async fn list(&self) -> Result<Vec<Retailer>, RepositoryError> {
        let retailers = sqlx::query_as::<_, Retailer>(
            r#"
            SELECT id, name, base_url
            FROM retailers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(retailers)
    }
}
