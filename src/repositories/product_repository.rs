use crate::error::RepositoryError;
use crate::models::Product;
use sqlx::SqlitePool;

/// Repository for tracked products
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Create a new ProductRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a product, or replace the attributes of an existing one (last write wins)
    pub async fn upsert(&self, product: &Product) -> Result<Product, RepositoryError> {
        let stored = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, size, category, brand)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE
            SET name = excluded.name,
                size = excluded.size,
                category = excluded.category,
                brand = excluded.brand
            RETURNING id, name, size, category, brand
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.size)
        .bind(&product.category)
        .bind(&product.brand)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Find a product by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, size, category, brand
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// List all products, ordered by id
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, size, category, brand
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Count products
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
