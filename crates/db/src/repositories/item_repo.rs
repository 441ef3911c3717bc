//! Repository for the `grocery_items` table.

use async_trait::async_trait;
use grocerific_core::types::DbId;
use grocerific_core::validation::ItemFields;

use crate::models::item::Item;
use crate::store::{ItemStore, StoreResult};
use crate::DbPool;

/// Column list shared across queries. `price` is read back as text so the
/// `NUMERIC(10,2)` scale yields the two-decimal representation.
const COLUMNS: &str =
    "id, name, category, quantity, price::text AS price, description, created_at, updated_at";

/// Durable item storage backed by PostgreSQL.
///
/// Each query checks a connection out of the pool and returns it when the
/// query completes, whatever the outcome.
#[derive(Clone)]
pub struct ItemRepo {
    pool: DbPool,
}

impl ItemRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl ItemStore for ItemRepo {
    async fn list_all(&self) -> StoreResult<Vec<Item>> {
        let query = format!("SELECT {COLUMNS} FROM grocery_items ORDER BY name ASC");
        let items = sqlx::query_as::<_, Item>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn get_by_id(&self, id: DbId) -> StoreResult<Option<Item>> {
        let query = format!("SELECT {COLUMNS} FROM grocery_items WHERE id = $1");
        let item = sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    /// `created_at` and `updated_at` both take the column default, so they
    /// share the transaction timestamp.
    async fn insert(&self, fields: &ItemFields) -> StoreResult<DbId> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO grocery_items (name, category, quantity, price, description)
             VALUES ($1, $2, $3, $4::numeric, $5)
             RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.category)
        .bind(fields.quantity)
        .bind(&fields.price)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!(id, name = %fields.name, "Inserted grocery item");
        Ok(id)
    }

    async fn update(&self, id: DbId, fields: &ItemFields) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE grocery_items SET
                name = $2,
                category = $3,
                quantity = $4,
                price = $5::numeric,
                description = $6,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
             WHERE id = $1",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.category)
        .bind(fields.quantity)
        .bind(&fields.price)
        .bind(&fields.description)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: DbId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM grocery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
